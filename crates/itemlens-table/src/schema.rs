// Copyright 2026 The itemlens authors
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Empty,
}

impl Value {
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) if value.is_finite() => value.to_string(),
            // A value with no sensible text rendering becomes an empty cell
            // rather than failing the whole document.
            Self::Float(_) | Self::Empty => String::new(),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    // Key order is first-insertion order; setting an existing key replaces
    // its value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.set(name, value);
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    names: Vec<String>,
}

impl ColumnSet {
    // First-seen order across the whole sequence: the first record's key
    // order, extended by keys that only appear in later records.
    pub fn derive(records: &[Record]) -> Self {
        let mut names: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !names.iter().any(|name| name == key) {
                    names.push(key.to_owned());
                }
            }
        }
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnSet, Record, Value};

    #[test]
    fn column_set_preserves_first_seen_order() {
        let records = vec![
            Record::new().with("ID", "SRS-1").with("Title", "test"),
            Record::new()
                .with("ID", "SRS-2")
                .with("Labels", "draft")
                .with("Title", "test 2"),
            Record::new().with("Owner", "sam"),
        ];

        let columns = ColumnSet::derive(&records);
        assert_eq!(columns.names(), ["ID", "Title", "Labels", "Owner"]);
    }

    #[test]
    fn column_set_deduplicates_repeated_keys() {
        let records = vec![
            Record::new().with("ID", "SRS-1"),
            Record::new().with("ID", "SRS-2"),
            Record::new().with("ID", "SRS-3"),
        ];

        let columns = ColumnSet::derive(&records);
        assert_eq!(columns.names(), ["ID"]);
        assert_eq!(columns.position("ID"), Some(0));
        assert_eq!(columns.position("Title"), None);
    }

    #[test]
    fn record_set_replaces_value_without_moving_key() {
        let mut record = Record::new().with("ID", "SRS-1").with("Title", "old");
        record.set("ID", "SRS-9");

        assert_eq!(record.keys().collect::<Vec<_>>(), ["ID", "Title"]);
        assert_eq!(record.get("ID"), Some(&Value::Text("SRS-9".to_owned())));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn display_text_renders_numbers_and_absorbs_non_finite_floats() {
        assert_eq!(Value::Integer(42).display_text(), "42");
        assert_eq!(Value::Float(2.5).display_text(), "2.5");
        assert_eq!(Value::Float(f64::NAN).display_text(), "");
        assert_eq!(Value::Float(f64::INFINITY).display_text(), "");
        assert_eq!(Value::Empty.display_text(), "");
    }
}
