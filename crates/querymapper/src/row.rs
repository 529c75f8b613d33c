//! Returned rows as ordered column → value mappings.

use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One returned record.
///
/// Columns keep the order the backend produced them in, so JSON export and
/// iteration are deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one decoded column. Used by drivers while building a row.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Value of the first column with the given name, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Integer content of a column, if present and integral.
    pub fn int(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Text content of a column, if present and textual.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column)?.as_text()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a str, &'a Value);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, Value)>,
        fn(&'a (String, Value)) -> (&'a str, &'a Value),
    >;

    fn into_iter(self) -> Self::IntoIter {
        fn pair<'a>(entry: &'a (String, Value)) -> (&'a str, &'a Value) {
            (entry.0.as_str(), &entry.1)
        }
        let pair: fn(&'a (String, Value)) -> (&'a str, &'a Value) = pair;
        self.columns.iter().map(pair)
    }
}

/// Serializes as a JSON object in column order.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        let mut row = Row::new();
        row.push("id", 5i64);
        row.push("name", "alice");
        row
    }

    #[test]
    fn test_get() {
        let row = sample();
        assert_eq!(row.int("id"), Some(5));
        assert_eq!(row.text("name"), Some("alice"));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"id":5,"name":"alice"}"#);
    }
}
