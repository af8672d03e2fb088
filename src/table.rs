use crate::record::Record;

/// Every table the engine manages, in persistence order.
pub(crate) const TABLE_NAMES: [&str; 6] = [
    "users",
    "services",
    "service_options",
    "bookings",
    "reviews",
    "site_settings",
];

/// A named, ordered collection of records plus the monotonic id counter
/// used by insert handlers. Ids are never reused: the counter only moves
/// forward and is persisted alongside the rows.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Table {
    rows: Vec<Record>,
    next_id: u64,
}

impl Default for Table {
    fn default() -> Self {
        Table::new()
    }
}

impl Table {
    pub(crate) fn new() -> Self {
        Table {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    pub(crate) fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Record> {
        &mut self.rows
    }

    pub(crate) fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    pub(crate) fn replace_rows(&mut self, rows: Vec<Record>) {
        self.rows = rows;
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn set_next_id(&mut self, next_id: u64) {
        self.next_id = next_id;
    }

    /// Hands out the next identifier and advances the counter.
    pub(crate) fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn max_id(&self) -> u64 {
        self.rows
            .iter()
            .filter_map(|row| row.i64_col("id"))
            .filter(|id| *id > 0)
            .map(|id| id as u64)
            .max()
            .unwrap_or(0)
    }

    /// Invariant: the counter is always at least `1 + max(id)`, so an
    /// existing id can never be handed out again, even when the counter
    /// document was lost or lags behind the row documents.
    pub(crate) fn enforce_id_floor(&mut self) {
        let floor = self.max_id() + 1;
        if self.next_id < floor {
            self.next_id = floor;
        }
    }
}

/// The closed, fixed set of tables. Handlers address tables directly by
/// field; the persistence layer goes through the by-name accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Tables {
    pub(crate) users: Table,
    pub(crate) services: Table,
    pub(crate) service_options: Table,
    pub(crate) bookings: Table,
    pub(crate) reviews: Table,
    pub(crate) site_settings: Table,
}

impl Tables {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn by_name(&self, name: &str) -> Option<&Table> {
        match name {
            "users" => Some(&self.users),
            "services" => Some(&self.services),
            "service_options" => Some(&self.service_options),
            "bookings" => Some(&self.bookings),
            "reviews" => Some(&self.reviews),
            "site_settings" => Some(&self.site_settings),
            _ => None,
        }
    }

    pub(crate) fn by_name_mut(&mut self, name: &str) -> Option<&mut Table> {
        match name {
            "users" => Some(&mut self.users),
            "services" => Some(&mut self.services),
            "service_options" => Some(&mut self.service_options),
            "bookings" => Some(&mut self.bookings),
            "reviews" => Some(&mut self.reviews),
            "site_settings" => Some(&mut self.site_settings),
            _ => None,
        }
    }

    pub(crate) fn entries(&self) -> [(&'static str, &Table); 6] {
        [
            ("users", &self.users),
            ("services", &self.services),
            ("service_options", &self.service_options),
            ("bookings", &self.bookings),
            ("reviews", &self.reviews),
            ("site_settings", &self.site_settings),
        ]
    }
}
