use std::fmt::{Display, Formatter};
use std::io;

use serde_json::Error as SerdeError;

/// Failures surfaced while opening the engine or flushing a table document.
///
/// Query execution never produces a `DbError`: absent rows, unmatched
/// descriptors, and undecodable documents all degrade to empty results.
#[derive(Debug)]
pub enum DbError {
    Io(io::Error),
    Serialization(SerdeError),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DbError::Io(err) => write!(f, "I/O error: {}", err),
            DbError::Serialization(err) => write!(f, "JSON serialization error: {}", err),
        }
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DbError::Io(err) => Some(err),
            DbError::Serialization(err) => Some(err),
        }
    }
}

impl From<io::Error> for DbError {
    fn from(err: io::Error) -> Self {
        DbError::Io(err)
    }
}

impl From<SerdeError> for DbError {
    fn from(err: SerdeError) -> Self {
        DbError::Serialization(err)
    }
}
