//! Accumulated form record
//!
//! The record is the single owner of collected values. It is built up
//! incrementally by the wizard controller as steps complete and is handed to
//! the submission gateway once, fully merged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::field::FieldId;

/// Mapping from field identifier to entered value, ordered by form order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRecord(BTreeMap<FieldId, String>);

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field's value, if present
    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Set a field's value, overwriting any stale prior value
    pub fn set(&mut self, field: FieldId, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.0.contains_key(&field)
    }

    /// Merge another record into this one; `other` wins on key collision
    pub fn merge(&mut self, other: &FormRecord) {
        for (field, value) in other.iter() {
            self.0.insert(field, value.to_string());
        }
    }

    /// A new record containing only the given fields (those present here)
    pub fn subset(&self, fields: &[FieldId]) -> FormRecord {
        let mut out = FormRecord::new();
        for field in fields {
            if let Some(value) = self.get(*field) {
                out.set(*field, value);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in form order
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.0.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

impl FromIterator<(FieldId, String)> for FormRecord {
    fn from_iter<I: IntoIterator<Item = (FieldId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(FieldId, &str)]) -> FormRecord {
        pairs.iter().map(|(f, v)| (*f, v.to_string())).collect()
    }

    #[test]
    fn test_merge_other_wins_on_collision() {
        let mut base = record(&[(FieldId::FullName, "Jane Doe"), (FieldId::City, "Oslo")]);
        let fresh = record(&[(FieldId::City, "Bergen")]);

        base.merge(&fresh);

        assert_eq!(base.get(FieldId::City), Some("Bergen"));
        assert_eq!(base.get(FieldId::FullName), Some("Jane Doe"));
    }

    #[test]
    fn test_subset_keeps_only_requested_fields() {
        let full = record(&[
            (FieldId::FullName, "Jane Doe"),
            (FieldId::Email, "jane@x.com"),
            (FieldId::City, "Oslo"),
        ]);

        let personal = full.subset(&[FieldId::FullName, FieldId::Email, FieldId::Phone]);
        assert_eq!(personal.len(), 2);
        assert!(!personal.contains(FieldId::City));
        assert!(!personal.contains(FieldId::Phone));
    }

    #[test]
    fn test_yaml_roundtrip_uses_wire_names() {
        let rec = record(&[(FieldId::FullName, "Jane Doe"), (FieldId::Zip, "12345")]);

        let yaml = serde_yml::to_string(&rec).unwrap();
        assert!(yaml.contains("fullName: Jane Doe"));

        let parsed: FormRecord = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(rec, parsed);
    }

    #[test]
    fn test_iteration_follows_form_order() {
        let rec = record(&[
            (FieldId::Zip, "12345"),
            (FieldId::FullName, "Jane Doe"),
            (FieldId::Email, "jane@x.com"),
        ]);

        let order: Vec<FieldId> = rec.iter().map(|(f, _)| f).collect();
        assert_eq!(order, vec![FieldId::FullName, FieldId::Email, FieldId::Zip]);
    }
}
