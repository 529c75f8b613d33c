//! Immutable snapshot of one executed statement.

use crate::row::Row;

/// What one `build()` produced: rows, affected count and, for inserts only,
/// the backend-generated identifier. The snapshot never changes after
/// construction.
#[derive(Clone, Debug, Default)]
pub struct ResultSet {
    rows: Vec<Row>,
    affected: u64,
    last_insert_id: Option<i64>,
}

impl ResultSet {
    pub(crate) fn new(rows: Vec<Row>, affected: u64, last_insert_id: Option<i64>) -> Self {
        Self {
            rows,
            affected,
            last_insert_id,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn affected(&self) -> u64 {
        self.affected
    }

    /// Generated identifier; `Some` only for create operations on backends
    /// that report one.
    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
