//! Thin record-mapping layer over executed statements.
//!
//! A domain type opts in by implementing [`Record`]; [`fetch`] then runs a
//! composed read chain and hydrates the returned rows into a
//! [`RecordCollection`] tagged with the owning table.

use crate::builder::Builder;
use crate::driver::Driver;
use crate::error::{MapperError, MapperResult};
use crate::result::ResultSet;
use crate::row::Row;

/// A domain type hydratable from one returned row.
pub trait Record: Sized {
    /// Table the record type maps to.
    fn table() -> &'static str;

    /// Identity column, for types that carry one.
    fn index_column() -> Option<&'static str> {
        None
    }

    /// Map one row into a record.
    ///
    /// Implementations typically read columns with [`Row::get`] and friends
    /// and fail with [`MapperError::ColumnMissing`] when a required column
    /// is absent; the [`require`] helper does exactly that.
    fn from_row(row: &Row) -> MapperResult<Self>;
}

/// Look up a required column, failing with the column name when absent.
pub fn require<'a>(row: &'a Row, column: &str) -> MapperResult<&'a crate::Value> {
    row.get(column)
        .ok_or_else(|| MapperError::ColumnMissing(column.to_string()))
}

/// Ordered hydrated records plus the table they came from.
///
/// Append-only while hydrating; read-only to the caller afterwards.
#[derive(Clone, Debug)]
pub struct RecordCollection<T> {
    table: String,
    records: Vec<T>,
}

impl<T> RecordCollection<T> {
    fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            records: Vec::new(),
        }
    }

    /// The owning table name, as recorded on the builder at fetch time.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.records.first()
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<T: serde::Serialize> RecordCollection<T> {
    /// Export the records as a JSON array, in collection order.
    pub fn to_json(&self) -> MapperResult<String> {
        serde_json::to_string(&self.records)
            .map_err(|error| MapperError::builder(error.to_string()))
    }
}

impl<T> IntoIterator for RecordCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a RecordCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Execute the builder's composed chain and hydrate every returned row.
///
/// The collection is named by [`Record::table`]. Hydration stops at the
/// first row `T` rejects.
pub async fn fetch<T: Record, D: Driver>(
    builder: &mut Builder<D>,
) -> MapperResult<RecordCollection<T>> {
    let result = builder.build().await?;
    hydrate(T::table().to_string(), &result)
}

fn hydrate<T: Record>(table: String, result: &ResultSet) -> MapperResult<RecordCollection<T>> {
    let mut collection = RecordCollection::new(table);
    for row in result.rows() {
        collection.records.push(T::from_row(row)?);
    }
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[derive(Debug, PartialEq, serde::Serialize)]
    struct User {
        id: i64,
        name: String,
    }

    impl Record for User {
        fn table() -> &'static str {
            "users"
        }

        fn index_column() -> Option<&'static str> {
            Some("id")
        }

        fn from_row(row: &Row) -> MapperResult<Self> {
            let id = match require(row, "id")? {
                Value::Int(id) => *id,
                _ => 0,
            };
            let name = require(row, "name")?
                .as_text()
                .unwrap_or_default()
                .to_string();
            Ok(Self { id, name })
        }
    }

    fn row(id: i64, name: &str) -> Row {
        let mut row = Row::new();
        row.push("id", id);
        row.push("name", name);
        row
    }

    #[test]
    fn test_hydrate_keeps_row_order() {
        let result = ResultSet::new(vec![row(1, "a"), row(2, "b")], 2, None);
        let collection: RecordCollection<User> = hydrate("users".to_string(), &result).unwrap();
        assert_eq!(collection.table(), "users");
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.first().map(|user| user.id), Some(1));
        assert_eq!(collection.records()[1].name, "b");
    }

    #[test]
    fn test_missing_column_names_the_column() {
        let mut bare = Row::new();
        bare.push("id", 1i64);
        let result = ResultSet::new(vec![bare], 1, None);
        let error = hydrate::<User>("users".to_string(), &result).unwrap_err();
        match error {
            MapperError::ColumnMissing(column) => assert_eq!(column, "name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_require_passes_through_present_values() {
        let row = row(7, "x");
        assert_eq!(require(&row, "id").unwrap(), &Value::Int(7));
    }

    #[test]
    fn test_json_export() {
        let result = ResultSet::new(vec![row(1, "a")], 1, None);
        let collection: RecordCollection<User> = hydrate("users".to_string(), &result).unwrap();
        assert_eq!(collection.to_json().unwrap(), r#"[{"id":1,"name":"a"}]"#);
    }
}
