// document.rs — The mutable permission document model.
//
// Entries are never deleted mid-pass. Removal is a two-step protocol:
// mark_*_removed() sets a tombstone, compact() physically drops the
// tombstoned entries at the end of a run. Indices handed out by
// class_index()/field_index() stay valid as long as only upserts
// (appends) and tombstones happen in between.

use std::cmp::Ordering;
use std::collections::HashMap;

/// One class visibility entry: may the role invoke this class?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAccess {
    pub class_name: String,
    pub enabled: bool,
    removed: bool,
}

impl ClassAccess {
    pub fn new(class_name: impl Into<String>, enabled: bool) -> Self {
        Self {
            class_name: class_name.into(),
            enabled,
            removed: false,
        }
    }

    /// Whether this entry is tombstoned for the next [`ProfileDocument::compact`].
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

/// One field permission entry: may the role read/edit this field?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPermission {
    /// Qualified identity, `Object.Field`.
    pub field: String,
    pub readable: bool,
    pub editable: bool,
    removed: bool,
}

impl FieldPermission {
    pub fn new(field: impl Into<String>, readable: bool, editable: bool) -> Self {
        Self {
            field: field.into(),
            readable,
            editable,
            removed: false,
        }
    }

    /// Whether this entry is tombstoned for the next [`ProfileDocument::compact`].
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

/// The permission document for exactly one profile.
///
/// Lifecycle: loaded from the store, mutated by one reconciliation pass,
/// written back, discarded. After reconciliation there is at most one
/// live entry per identity and kind; duplicates in a loaded document are
/// tolerated, and only the first occurrence is ever matched.
#[derive(Debug, Clone, Default)]
pub struct ProfileDocument {
    name: String,
    pub class_accesses: Vec<ClassAccess>,
    pub field_permissions: Vec<FieldPermission>,
}

impl ProfileDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_accesses: Vec::new(),
            field_permissions: Vec::new(),
        }
    }

    /// The profile identity this document belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity → position snapshot of live class entries.
    ///
    /// Positional: must be rebuilt after any structural change other
    /// than appends and tombstones. First occurrence wins.
    pub fn class_index(&self) -> HashMap<String, usize> {
        let mut index = HashMap::with_capacity(self.class_accesses.len());
        for (i, entry) in self.class_accesses.iter().enumerate() {
            if !entry.removed {
                index.entry(entry.class_name.clone()).or_insert(i);
            }
        }
        index
    }

    /// Identity → position snapshot of live field entries.
    pub fn field_index(&self) -> HashMap<String, usize> {
        let mut index = HashMap::with_capacity(self.field_permissions.len());
        for (i, entry) in self.field_permissions.iter().enumerate() {
            if !entry.removed {
                index.entry(entry.field.clone()).or_insert(i);
            }
        }
        index
    }

    /// Positions of live class entries whose identity already appeared
    /// at an earlier position. These are exactly the entries the index
    /// snapshots cannot see.
    pub fn duplicate_class_indices(&self) -> Vec<usize> {
        let mut seen = HashMap::new();
        let mut duplicates = Vec::new();
        for (i, entry) in self.class_accesses.iter().enumerate() {
            if !entry.removed && seen.insert(entry.class_name.clone(), i).is_some() {
                duplicates.push(i);
            }
        }
        duplicates
    }

    /// Positions of live field entries whose identity already appeared
    /// at an earlier position.
    pub fn duplicate_field_indices(&self) -> Vec<usize> {
        let mut seen = HashMap::new();
        let mut duplicates = Vec::new();
        for (i, entry) in self.field_permissions.iter().enumerate() {
            if !entry.removed && seen.insert(entry.field.clone(), i).is_some() {
                duplicates.push(i);
            }
        }
        duplicates
    }

    /// First live class entry with the given identity.
    pub fn find_class(&self, class_name: &str) -> Option<&ClassAccess> {
        self.class_accesses
            .iter()
            .find(|e| !e.removed && e.class_name == class_name)
    }

    /// First live field entry with the given identity.
    pub fn find_field(&self, field: &str) -> Option<&FieldPermission> {
        self.field_permissions
            .iter()
            .find(|e| !e.removed && e.field == field)
    }

    /// Update the enabled flag of the first matching class entry, or
    /// append a new entry. Returns `true` if an entry was appended.
    pub fn upsert_class(&mut self, class_name: &str, enabled: bool) -> bool {
        if let Some(entry) = self
            .class_accesses
            .iter_mut()
            .find(|e| !e.removed && e.class_name == class_name)
        {
            entry.enabled = enabled;
            false
        } else {
            self.class_accesses.push(ClassAccess::new(class_name, enabled));
            true
        }
    }

    /// Update the flags of the first matching field entry, or append a
    /// new entry. Returns `true` if an entry was appended.
    pub fn upsert_field(&mut self, field: &str, readable: bool, editable: bool) -> bool {
        if let Some(entry) = self
            .field_permissions
            .iter_mut()
            .find(|e| !e.removed && e.field == field)
        {
            entry.readable = readable;
            entry.editable = editable;
            false
        } else {
            self.field_permissions
                .push(FieldPermission::new(field, readable, editable));
            true
        }
    }

    /// Tombstone the class entry at `index`.
    pub fn mark_class_removed(&mut self, index: usize) {
        if let Some(entry) = self.class_accesses.get_mut(index) {
            entry.removed = true;
        }
    }

    /// Tombstone the field entry at `index`.
    pub fn mark_field_removed(&mut self, index: usize) {
        if let Some(entry) = self.field_permissions.get_mut(index) {
            entry.removed = true;
        }
    }

    /// Physically drop all tombstoned entries, preserving the relative
    /// order of survivors. Call once per document, after all passes.
    pub fn compact(&mut self) {
        self.class_accesses.retain(|e| !e.removed);
        self.field_permissions.retain(|e| !e.removed);
    }

    /// Sort class entries with a custom comparator over identities.
    /// The sort is stable and affects class entries only.
    pub fn sort_classes_by(&mut self, mut cmp: impl FnMut(&str, &str) -> Ordering) {
        self.class_accesses
            .sort_by(|a, b| cmp(&a.class_name, &b.class_name));
    }

    /// Sort field entries with a custom comparator over identities.
    pub fn sort_fields_by(&mut self, mut cmp: impl FnMut(&str, &str) -> Ordering) {
        self.field_permissions.sort_by(|a, b| cmp(&a.field, &b.field));
    }

    /// Sort class entries by case-sensitive 3-way string comparison.
    pub fn sort_classes(&mut self) {
        self.sort_classes_by(str::cmp);
    }

    /// Sort field entries by case-sensitive 3-way string comparison.
    pub fn sort_fields(&mut self) {
        self.sort_fields_by(str::cmp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_classes(names: &[(&str, bool)]) -> ProfileDocument {
        let mut doc = ProfileDocument::new("Admin");
        for (name, enabled) in names {
            doc.class_accesses.push(ClassAccess::new(*name, *enabled));
        }
        doc
    }

    #[test]
    fn upsert_class_updates_existing_entry() {
        let mut doc = doc_with_classes(&[("A", false)]);

        let appended = doc.upsert_class("A", true);
        assert!(!appended);
        assert_eq!(doc.class_accesses.len(), 1);
        assert!(doc.class_accesses[0].enabled);
    }

    #[test]
    fn upsert_class_appends_missing_entry() {
        let mut doc = doc_with_classes(&[("A", false)]);

        let appended = doc.upsert_class("B", true);
        assert!(appended);
        assert_eq!(doc.class_accesses.len(), 2);
        assert_eq!(doc.class_accesses[1].class_name, "B");
    }

    #[test]
    fn upsert_field_update_or_append() {
        let mut doc = ProfileDocument::new("Admin");
        assert!(doc.upsert_field("X.f1", true, false));
        assert!(!doc.upsert_field("X.f1", true, true));
        assert_eq!(doc.field_permissions.len(), 1);
        assert!(doc.field_permissions[0].editable);
    }

    #[test]
    fn index_first_occurrence_wins_for_duplicates() {
        let doc = doc_with_classes(&[("A", false), ("A", true), ("B", false)]);

        let index = doc.class_index();
        assert_eq!(index["A"], 0);
        assert_eq!(index["B"], 2);
    }

    #[test]
    fn duplicate_indices_cover_every_later_occurrence() {
        let doc = doc_with_classes(&[("A", false), ("A", true), ("B", false), ("A", true)]);
        assert_eq!(doc.duplicate_class_indices(), vec![1, 3]);
    }

    #[test]
    fn tombstoned_entries_are_invisible_to_lookups() {
        let mut doc = doc_with_classes(&[("A", false), ("B", true)]);
        doc.mark_class_removed(0);

        assert!(doc.find_class("A").is_none());
        assert!(!doc.class_index().contains_key("A"));
        // Still physically present until compaction.
        assert_eq!(doc.class_accesses.len(), 2);
    }

    #[test]
    fn compact_preserves_survivor_order() {
        let mut doc = doc_with_classes(&[("A", false), ("B", true), ("C", false), ("D", true)]);
        doc.mark_class_removed(1);
        doc.mark_class_removed(2);
        doc.compact();

        let names: Vec<_> = doc.class_accesses.iter().map(|e| e.class_name.as_str()).collect();
        assert_eq!(names, vec!["A", "D"]);
    }

    #[test]
    fn sort_is_independent_per_kind() {
        let mut doc = doc_with_classes(&[("B", false), ("A", true)]);
        doc.field_permissions.push(FieldPermission::new("Z.f", true, false));
        doc.field_permissions.push(FieldPermission::new("A.f", true, false));

        doc.sort_classes();

        let classes: Vec<_> = doc.class_accesses.iter().map(|e| e.class_name.as_str()).collect();
        assert_eq!(classes, vec!["A", "B"]);
        // Field order untouched.
        assert_eq!(doc.field_permissions[0].field, "Z.f");

        doc.sort_fields();
        assert_eq!(doc.field_permissions[0].field, "A.f");
    }

    #[test]
    fn default_sort_is_case_sensitive() {
        let mut doc = doc_with_classes(&[("alpha", false), ("Beta", false)]);
        doc.sort_classes();

        // Uppercase sorts before lowercase in byte order.
        let names: Vec<_> = doc.class_accesses.iter().map(|e| e.class_name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "alpha"]);
    }
}
