// reconciler.rs — The reconciliation passes.
//
// Invariants the passes rely on:
//
// - upserts only ever append (the entity is known to be absent), so
//   positions recorded in the index snapshot stay valid;
// - removal is tombstoning, physical compaction happens once at the end;
// - sorting runs after both passes, when no index is held anymore.
//
// Required fields are skipped in the field pass: access to them is
// implicit and an explicit entry must never be added for one. Ignored
// identities are excluded from reconciliation entirely — neither added
// nor removed.

use std::cmp::Ordering;

use psync_policy::{PolicyResolver, SortOrder};
use psync_profile::{ProfileDocument, ProfileStore};
use psync_scan::SourceSnapshot;

use crate::error::ReconcileError;
use crate::report::ReconcileReport;

/// Reconciles permission documents against a source snapshot.
pub struct Reconciler {
    resolver: PolicyResolver,
}

impl Reconciler {
    pub fn new(resolver: PolicyResolver) -> Self {
        Self { resolver }
    }

    /// Bring one document in sync with the snapshot, in memory.
    ///
    /// Runs the class pass, the field pass, per-kind sorting, and the
    /// final compaction. Returns the mutation counts.
    pub fn reconcile(
        &self,
        doc: &mut ProfileDocument,
        snapshot: &SourceSnapshot,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::new(doc.name());

        self.reconcile_classes(doc, snapshot, &mut report);
        self.reconcile_fields(doc, snapshot, &mut report);

        let policy = self.resolver.policy();
        if policy.sort_classes.enabled {
            doc.sort_classes_by(comparator(policy.sort_classes.order));
        }
        if policy.sort_fields.enabled {
            doc.sort_fields_by(comparator(policy.sort_fields.order));
        }

        doc.compact();
        report
    }

    fn reconcile_classes(
        &self,
        doc: &mut ProfileDocument,
        snapshot: &SourceSnapshot,
        report: &mut ReconcileReport,
    ) {
        let toggles = &self.resolver.policy().toggles;
        let mut unaccounted = doc.class_index();

        for entity in &snapshot.classes {
            if self.resolver.is_ignored(&entity.name) {
                tracing::debug!(class = %entity.name, "class matches ignore pattern");
                continue;
            }
            if unaccounted.remove(&entity.name).is_some() {
                // Present: the existing entry keeps its values.
                continue;
            }
            if toggles.add_classes {
                let enabled = self.resolver.class_visibility(doc.name());
                doc.upsert_class(&entity.name, enabled);
                tracing::info!(
                    profile = doc.name(),
                    class = %entity.name,
                    enabled,
                    "adding missing class entry"
                );
                report.classes_added += 1;
            }
        }

        if toggles.remove_classes {
            for (name, index) in unaccounted {
                if self.resolver.is_ignored(&name) {
                    continue;
                }
                doc.mark_class_removed(index);
                tracing::info!(
                    profile = doc.name(),
                    class = %name,
                    "removing class entry with no local class"
                );
                report.classes_removed += 1;
            }

            // Later occurrences of a duplicated identity are invisible to
            // the index; drop them so one identity keeps one entry.
            for index in doc.duplicate_class_indices() {
                let name = doc.class_accesses[index].class_name.clone();
                if self.resolver.is_ignored(&name) {
                    continue;
                }
                doc.mark_class_removed(index);
                tracing::info!(profile = doc.name(), class = %name, "removing duplicate class entry");
                report.classes_removed += 1;
            }
        }
    }

    fn reconcile_fields(
        &self,
        doc: &mut ProfileDocument,
        snapshot: &SourceSnapshot,
        report: &mut ReconcileReport,
    ) {
        let toggles = &self.resolver.policy().toggles;
        let mut unaccounted = doc.field_index();

        for entity in &snapshot.fields {
            if entity.required {
                // Access to required fields is implicit; never declared.
                tracing::debug!(field = %entity.name, "skipping required field");
                continue;
            }
            if self.resolver.is_ignored(&entity.name) {
                tracing::debug!(field = %entity.name, "field matches ignore pattern");
                continue;
            }
            if unaccounted.remove(&entity.name).is_some() {
                continue;
            }
            if toggles.add_fields {
                let access = self.resolver.field_access(doc.name(), &entity.name);
                doc.upsert_field(&entity.name, access.read, access.write);
                tracing::info!(
                    profile = doc.name(),
                    field = %entity.name,
                    read = access.read,
                    write = access.write,
                    "adding missing field entry"
                );
                report.fields_added += 1;
            }
        }

        if toggles.remove_fields {
            for (name, index) in unaccounted {
                if self.resolver.is_ignored(&name) {
                    continue;
                }
                doc.mark_field_removed(index);
                tracing::info!(
                    profile = doc.name(),
                    field = %name,
                    "removing field entry with no local field"
                );
                report.fields_removed += 1;
            }

            for index in doc.duplicate_field_indices() {
                let name = doc.field_permissions[index].field.clone();
                if self.resolver.is_ignored(&name) {
                    continue;
                }
                doc.mark_field_removed(index);
                tracing::info!(profile = doc.name(), field = %name, "removing duplicate field entry");
                report.fields_removed += 1;
            }
        }
    }
}

/// Load, reconcile, and save one profile.
///
/// The per-profile task boundary: any failure here is reported for this
/// profile alone and never propagates to sibling profiles.
pub fn run_profile(
    reconciler: &Reconciler,
    store: &ProfileStore,
    snapshot: &SourceSnapshot,
    name: &str,
) -> Result<ReconcileReport, ReconcileError> {
    let mut doc = store.load(name).map_err(|source| ReconcileError::Load {
        profile: name.to_string(),
        source,
    })?;

    let report = reconciler.reconcile(&mut doc, snapshot);

    store.save(&doc).map_err(|source| ReconcileError::Save {
        profile: name.to_string(),
        source,
    })?;

    tracing::info!(profile = name, %report, "profile reconciled");
    Ok(report)
}

fn comparator(order: SortOrder) -> fn(&str, &str) -> Ordering {
    match order {
        SortOrder::Lexicographic => str::cmp,
        SortOrder::CaseInsensitive => |a, b| {
            a.to_ascii_lowercase()
                .cmp(&b.to_ascii_lowercase())
                .then(a.cmp(b))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psync_policy::{FieldAccess, PolicyConfig};
    use psync_profile::{ClassAccess, FieldPermission};
    use psync_scan::LocalEntity;

    fn reconciler(policy: PolicyConfig) -> Reconciler {
        Reconciler::new(PolicyResolver::new(policy).unwrap())
    }

    fn snapshot(classes: &[&str], fields: &[(&str, bool)]) -> SourceSnapshot {
        SourceSnapshot {
            classes: classes
                .iter()
                .map(|c| LocalEntity::class(*c, Some("Active".to_string())))
                .collect(),
            fields: fields
                .iter()
                .map(|(f, required)| LocalEntity::field(*f, *required))
                .collect(),
        }
    }

    fn class_names(doc: &ProfileDocument) -> Vec<&str> {
        doc.class_accesses.iter().map(|e| e.class_name.as_str()).collect()
    }

    fn field_names(doc: &ProfileDocument) -> Vec<&str> {
        doc.field_permissions.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn adds_missing_class_and_keeps_existing_values() {
        // Document: [A(false)]; local: [A, B]; add+remove on,
        // default visibility true. A keeps false, B added as true,
        // order [A, B] after sort.
        let mut policy = PolicyConfig::default();
        policy.defaults.class_visibility = true;
        let rec = reconciler(policy);

        let mut doc = ProfileDocument::new("Admin");
        doc.class_accesses.push(ClassAccess::new("A", false));

        let report = rec.reconcile(&mut doc, &snapshot(&["A", "B"], &[]));

        assert_eq!(class_names(&doc), vec!["A", "B"]);
        assert!(!doc.class_accesses[0].enabled, "A must keep its value");
        assert!(doc.class_accesses[1].enabled, "B gets the default");
        assert_eq!(report.classes_added, 1);
        assert_eq!(report.classes_removed, 0);
    }

    #[test]
    fn removes_orphaned_field_entries() {
        // Document: [X.f1(r,!w), X.f2(r,w)]; local: [X.f1]; remove on.
        let policy = PolicyConfig {
            toggles: psync_policy::SyncToggles {
                remove_fields: true,
                ..Default::default()
            },
            ..PolicyConfig::default()
        };
        let rec = reconciler(policy);

        let mut doc = ProfileDocument::new("Admin");
        doc.field_permissions.push(FieldPermission::new("X.f1", true, false));
        doc.field_permissions.push(FieldPermission::new("X.f2", true, true));

        let report = rec.reconcile(&mut doc, &snapshot(&[], &[("X.f1", false)]));

        assert_eq!(field_names(&doc), vec!["X.f1"]);
        assert!(doc.field_permissions[0].readable);
        assert!(!doc.field_permissions[0].editable);
        assert_eq!(report.fields_removed, 1);
    }

    #[test]
    fn ignored_class_is_never_added() {
        // Ignore pattern `^Case`: CaseComment never enters the profile
        // regardless of the add toggle.
        let policy = PolicyConfig {
            ignored: vec!["^Case".to_string()],
            ..PolicyConfig::default()
        };
        let rec = reconciler(policy);

        let mut doc = ProfileDocument::new("Admin");
        rec.reconcile(&mut doc, &snapshot(&["CaseComment", "Order"], &[]));

        assert_eq!(class_names(&doc), vec!["Order"]);
    }

    #[test]
    fn ignored_entries_are_retained_not_removed() {
        // Excluded from reconciliation entirely: an ignored identity
        // already in the document survives even with remove on.
        let policy = PolicyConfig {
            ignored: vec!["^Legacy".to_string()],
            ..PolicyConfig::default()
        };
        let rec = reconciler(policy);

        let mut doc = ProfileDocument::new("Admin");
        doc.class_accesses.push(ClassAccess::new("LegacyThing", true));

        rec.reconcile(&mut doc, &snapshot(&[], &[]));
        assert_eq!(class_names(&doc), vec!["LegacyThing"]);
    }

    #[test]
    fn required_fields_are_never_added() {
        let rec = reconciler(PolicyConfig::default());

        let mut doc = ProfileDocument::new("Admin");
        rec.reconcile(
            &mut doc,
            &snapshot(&[], &[("Order.Id", true), ("Order.ContractId", false)]),
        );

        assert_eq!(field_names(&doc), vec!["Order.ContractId"]);
    }

    #[test]
    fn remove_toggle_off_retains_orphans() {
        let policy = PolicyConfig {
            toggles: psync_policy::SyncToggles {
                remove_classes: false,
                ..Default::default()
            },
            ..PolicyConfig::default()
        };
        let rec = reconciler(policy);

        let mut doc = ProfileDocument::new("Admin");
        doc.class_accesses.push(ClassAccess::new("Gone", true));

        let report = rec.reconcile(&mut doc, &snapshot(&[], &[]));

        assert_eq!(class_names(&doc), vec!["Gone"]);
        assert!(report.is_noop());
    }

    #[test]
    fn add_toggle_off_adds_nothing() {
        let policy = PolicyConfig {
            toggles: psync_policy::SyncToggles {
                add_classes: false,
                add_fields: false,
                ..Default::default()
            },
            ..PolicyConfig::default()
        };
        let rec = reconciler(policy);

        let mut doc = ProfileDocument::new("Admin");
        let report = rec.reconcile(
            &mut doc,
            &snapshot(&["A"], &[("X.f", false)]),
        );

        assert!(doc.class_accesses.is_empty());
        assert!(doc.field_permissions.is_empty());
        assert!(report.is_noop());
    }

    #[test]
    fn toggles_are_independent_across_kinds() {
        // Class removal on, field removal off: the orphaned class goes,
        // the orphaned field stays.
        let rec = reconciler(PolicyConfig::default()); // remove_fields off by default

        let mut doc = ProfileDocument::new("Admin");
        doc.class_accesses.push(ClassAccess::new("GoneClass", true));
        doc.field_permissions.push(FieldPermission::new("Gone.Field", true, false));

        rec.reconcile(&mut doc, &snapshot(&[], &[]));

        assert!(doc.class_accesses.is_empty());
        assert_eq!(field_names(&doc), vec!["Gone.Field"]);
    }

    #[test]
    fn empty_local_set_with_remove_clears_the_kind() {
        let policy = PolicyConfig {
            toggles: psync_policy::SyncToggles {
                remove_fields: true,
                ..Default::default()
            },
            ..PolicyConfig::default()
        };
        let rec = reconciler(policy);

        let mut doc = ProfileDocument::new("Admin");
        doc.field_permissions.push(FieldPermission::new("A.f", true, false));
        doc.field_permissions.push(FieldPermission::new("B.f", true, false));

        rec.reconcile(&mut doc, &snapshot(&[], &[]));
        assert!(doc.field_permissions.is_empty());
    }

    #[test]
    fn empty_document_gets_every_local_entity_with_defaults() {
        let mut policy = PolicyConfig::default();
        policy.defaults.field_access = FieldAccess {
            read: true,
            write: false,
        };
        let rec = reconciler(policy);

        let mut doc = ProfileDocument::new("Admin");
        rec.reconcile(
            &mut doc,
            &snapshot(&["A", "B"], &[("X.f1", false), ("X.f2", false)]),
        );

        assert_eq!(class_names(&doc), vec!["A", "B"]);
        assert_eq!(field_names(&doc), vec!["X.f1", "X.f2"]);
        assert!(doc.field_permissions.iter().all(|f| f.readable && !f.editable));
    }

    #[test]
    fn profile_override_drives_added_values() {
        let mut policy = PolicyConfig::default();
        policy.defaults.class_visibility = false;
        policy.class_visibility.insert("Admin".to_string(), true);
        let rec = reconciler(policy);

        let mut admin = ProfileDocument::new("Admin");
        let mut readonly = ProfileDocument::new("ReadOnly");
        let snap = snapshot(&["A"], &[]);
        rec.reconcile(&mut admin, &snap);
        rec.reconcile(&mut readonly, &snap);

        assert!(admin.class_accesses[0].enabled);
        assert!(!readonly.class_accesses[0].enabled);
    }

    #[test]
    fn reconciliation_is_idempotent() {
        let mut policy = PolicyConfig::default();
        policy.toggles.remove_fields = true;
        let rec = reconciler(policy);

        let snap = snapshot(
            &["B", "A"],
            &[("X.f2", false), ("X.f1", false), ("X.req", true)],
        );

        let mut doc = ProfileDocument::new("Admin");
        doc.class_accesses.push(ClassAccess::new("Stale", true));
        let first = rec.reconcile(&mut doc, &snap);
        assert!(!first.is_noop());

        let after_first = doc.clone();
        let second = rec.reconcile(&mut doc, &snap);

        assert!(second.is_noop());
        assert_eq!(doc.class_accesses, after_first.class_accesses);
        assert_eq!(doc.field_permissions, after_first.field_permissions);
    }

    #[test]
    fn sort_can_be_disabled_per_kind() {
        let policy = PolicyConfig {
            sort_classes: psync_policy::SortOptions {
                enabled: false,
                ..Default::default()
            },
            ..PolicyConfig::default()
        };
        let rec = reconciler(policy);

        let mut doc = ProfileDocument::new("Admin");
        rec.reconcile(&mut doc, &snapshot(&["B", "A"], &[("Z.f", false), ("A.f", false)]));

        // Classes keep discovery order, fields are sorted.
        assert_eq!(class_names(&doc), vec!["B", "A"]);
        assert_eq!(field_names(&doc), vec!["A.f", "Z.f"]);
    }

    #[test]
    fn case_insensitive_order_is_available() {
        let policy = PolicyConfig {
            sort_classes: psync_policy::SortOptions {
                enabled: true,
                order: SortOrder::CaseInsensitive,
            },
            ..PolicyConfig::default()
        };
        let rec = reconciler(policy);

        let mut doc = ProfileDocument::new("Admin");
        rec.reconcile(&mut doc, &snapshot(&["beta", "Alpha"], &[]));

        assert_eq!(class_names(&doc), vec!["Alpha", "beta"]);
    }

    #[test]
    fn duplicate_entries_first_match_wins() {
        // A duplicated identity: the first entry is the one accounted
        // for; the second is treated as an orphan and removed.
        let rec = reconciler(PolicyConfig::default());

        let mut doc = ProfileDocument::new("Admin");
        doc.class_accesses.push(ClassAccess::new("A", false));
        doc.class_accesses.push(ClassAccess::new("A", true));

        rec.reconcile(&mut doc, &snapshot(&["A"], &[]));

        assert_eq!(class_names(&doc), vec!["A"]);
        assert!(!doc.class_accesses[0].enabled);
    }
}
