//! Row and scalar value definitions for the simulated tables.
//!
//! Every table row is a [`Record`]: an ordered mapping of column name to a
//! dynamically typed [`Value`]. Rows keep their column order so that a
//! persisted document stays readable and positional access (see
//! [`Statement::fetch_column`](crate::Statement::fetch_column)) is stable
//! across save/load cycles.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A scalar cell value.
///
/// Columns are heterogeneous: the same table mixes strings, integers,
/// prices, flags, and nulls. `Value` keeps each cell precise while
/// serializing to the natural JSON form (`null`, `true`, `42`, `18.0`,
/// `"yoga"`).
///
/// # Examples
///
/// ```
/// use fitconnect_simdb::Value;
///
/// let rate = Value::from(75.0);
/// assert_eq!(rate.as_f64(), Some(75.0));
///
/// // Identifier columns are compared loosely; a stringly-typed id still
/// // coerces to its numeric form.
/// assert_eq!(Value::from("9").as_i64(), Some(9));
/// assert!(Value::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of the value, coercing whole floats and numeric strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Float view of the value, coercing integers and numeric strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One table row: an ordered list of `(column, value)` pairs.
///
/// Columns keep insertion order. `set` replaces an existing column in place,
/// so a row cloned from a table and decorated with aggregate columns keeps
/// its original layout followed by the appended aggregates.
///
/// # Examples
///
/// ```
/// use fitconnect_simdb::{Record, Value};
///
/// let row = Record::new()
///     .with("id", 1_i64)
///     .with("username", "admin")
///     .with("hourly_rate", Value::Null);
///
/// assert_eq!(row.str_col("username"), Some("admin"));
/// assert_eq!(row.column_at(0), Some(&Value::Int(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    columns: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Replaces the value of `column`, or appends the column if absent.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Value at a column position, in insertion order.
    pub fn column_at(&self, index: usize) -> Option<&Value> {
        self.columns.get(index).map(|(_, value)| value)
    }

    pub fn str_col(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn i64_col(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    pub fn f64_col(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_f64)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of column names to scalar values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Record, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut columns = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    columns.push((name, value));
                }
                Ok(Record { columns })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}
