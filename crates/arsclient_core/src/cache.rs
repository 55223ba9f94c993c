//! Per-connection schema and field caches.
//!
//! Caches live for the connection's lifetime and are never invalidated:
//! the server is assumed schema-stable within one session. A schema's
//! entry is either absent or fully populated; the session builds a fresh
//! [`FieldTable`] and inserts it whole, so partial population is never
//! observable.

use arsclient_sys::ARInternalId;
use std::collections::HashMap;

/// A field id, unique within one schema.
pub type FieldId = ARInternalId;

/// Mapping from enum ordinal to label for one enumeration field.
pub type EnumTable = HashMap<u32, String>;

/// Field metadata for one schema: forward and reverse name/id maps plus the
/// enum tables of its enumeration fields.
///
/// Invariant: `by_id` is exactly the inverse of `by_name`; both are built
/// together. Field names are assumed unique per schema (the server does not
/// enforce this); a duplicate name keeps the last mapping seen.
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    by_name: HashMap<String, FieldId>,
    by_id: HashMap<FieldId, String>,
    enums: HashMap<FieldId, EnumTable>,
}

impl FieldTable {
    /// Records a field in both directions.
    pub(crate) fn insert_field(&mut self, id: FieldId, name: String) {
        self.by_name.insert(name.clone(), id);
        self.by_id.insert(id, name);
    }

    /// Records the enum table of an enumeration field.
    pub(crate) fn insert_enum(&mut self, id: FieldId, table: EnumTable) {
        self.enums.insert(id, table);
    }

    /// Id of the field named `name`.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<FieldId> {
        self.by_name.get(name).copied()
    }

    /// Name of the field with id `id`.
    #[must_use]
    pub fn name_of(&self, id: FieldId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Enum table of the field with id `id`, when it is an enumeration.
    #[must_use]
    pub fn enum_table(&self, id: FieldId) -> Option<&EnumTable> {
        self.enums.get(&id)
    }

    /// Field names in lexicographic order.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the table holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Normalizes a regular-style enum list: the ordinal of each label is its
/// zero-based position.
pub(crate) fn regular_enum_table(labels: Vec<String>) -> EnumTable {
    labels
        .into_iter()
        .enumerate()
        .map(|(ordinal, label)| (ordinal as u32, label))
        .collect()
}

/// Normalizes a custom-style enum list: ordinals and labels come from
/// explicit pairs, in whatever order the server reports them.
pub(crate) fn custom_enum_table(pairs: Vec<(u32, String)>) -> EnumTable {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_reverse_stay_inverse() {
        let mut table = FieldTable::default();
        table.insert_field(2, "Entry Id".into());
        table.insert_field(8, "Short Description".into());

        assert_eq!(table.id_of("Short Description"), Some(8));
        assert_eq!(table.name_of(2), Some("Entry Id"));
        assert_eq!(table.id_of("Missing"), None);
        assert_eq!(table.name_of(9), None);
        assert_eq!(table.len(), 2);
        for (name, id) in [("Entry Id", 2), ("Short Description", 8)] {
            assert_eq!(table.id_of(name), Some(id));
            assert_eq!(table.name_of(id), Some(name));
        }
    }

    #[test]
    fn sorted_names_are_lexicographic() {
        let mut table = FieldTable::default();
        table.insert_field(3, "Status".into());
        table.insert_field(1, "Assignee".into());
        table.insert_field(2, "Priority".into());
        assert_eq!(table.sorted_names(), ["Assignee", "Priority", "Status"]);
    }

    #[test]
    fn regular_style_uses_positions() {
        let table = regular_enum_table(vec!["Open".into(), "Closed".into(), "Pending".into()]);
        assert_eq!(table[&0], "Open");
        assert_eq!(table[&1], "Closed");
        assert_eq!(table[&2], "Pending");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn custom_style_uses_explicit_ordinals() {
        let table = custom_enum_table(vec![(5, "Urgent".into()), (1, "Low".into())]);
        assert_eq!(table[&5], "Urgent");
        assert_eq!(table[&1], "Low");
        assert_eq!(table.get(&0), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn duplicate_name_keeps_last_mapping() {
        // Stated limitation: names are assumed unique per schema.
        let mut table = FieldTable::default();
        table.insert_field(10, "Status".into());
        table.insert_field(11, "Status".into());
        assert_eq!(table.id_of("Status"), Some(11));
    }
}
