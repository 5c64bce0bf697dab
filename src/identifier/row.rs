use crate::core::Value;
use std::collections::HashMap;

/// A materialized result row, addressed by external attribute name.
pub trait TupleRow {
    fn get(&self, alias: &str) -> Option<&Value>;
}

impl TupleRow for HashMap<String, Value> {
    fn get(&self, alias: &str) -> Option<&Value> {
        HashMap::get(self, alias)
    }
}

/// Row with named columns in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResultRow {
    columns: Vec<(String, Value)>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, alias: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(alias, value);
        self
    }

    /// Sets `alias`, replacing an earlier value.
    pub fn insert(&mut self, alias: impl Into<String>, value: impl Into<Value>) {
        let alias = alias.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| *name == alias) {
            Some(column) => column.1 = value,
            None => self.columns.push((alias, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl TupleRow for ResultRow {
    fn get(&self, alias: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == alias)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces() {
        let mut row = ResultRow::new().with("Id", 1_i64).with("Code", "AB");
        row.insert("Id", 2_i64);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("Id"), Some(&Value::Integer(2)));
        assert_eq!(row.get("Missing"), None);
    }

    #[test]
    fn test_hash_map_row() {
        let mut row = HashMap::new();
        row.insert("Id".to_string(), Value::Integer(42));
        assert_eq!(TupleRow::get(&row, "Id"), Some(&Value::Integer(42)));
    }
}
