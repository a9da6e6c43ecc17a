use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::schema::DetectedFields;
use crate::summary::ReconSummary;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single parsed row: field name -> value, in header order.
///
/// Setting an existing field replaces its value in place, so the field order
/// always follows first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Ordered rows sharing a schema. The schema is read from the first record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Field names of the first record, in order. Empty for an empty dataset.
    pub fn schema(&self) -> Vec<String> {
        self.first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Field names detected on each side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparedFields {
    pub source: DetectedFields,
    pub reference: DetectedFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationResult {
    /// Source records absent from the reference, unchanged, in source order.
    pub unmatched: Dataset,
    /// Reference records followed by reference-shaped projections of `unmatched`.
    pub combined: Dataset,
    pub has_unmatched: bool,
    pub fields: ComparedFields,
    pub summary: ReconSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut r: Record = [("a", "1"), ("b", "2")].into_iter().collect();
        r.set("a", "9");
        r.set("c", "3");
        let names: Vec<&str> = r.field_names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(r.get("a"), Some("9"));
    }

    #[test]
    fn schema_from_first_record() {
        let ds = Dataset::new(vec![
            [("Email", ""), ("Phone", "")].into_iter().collect(),
            [("Other", "")].into_iter().collect(),
        ]);
        assert_eq!(ds.schema(), vec!["Email".to_string(), "Phone".to_string()]);
        assert!(Dataset::default().schema().is_empty());
    }

    #[test]
    fn record_serializes_as_ordered_map() {
        let r: Record = [("z", "1"), ("a", "2")].into_iter().collect();
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }
}
