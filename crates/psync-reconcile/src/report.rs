// report.rs — What one reconciliation run did to one profile.

use serde::{Deserialize, Serialize};

/// Mutation counts for one profile's reconciliation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub profile: String,
    pub classes_added: usize,
    pub classes_removed: usize,
    pub fields_added: usize,
    pub fields_removed: usize,
}

impl ReconcileReport {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            ..Self::default()
        }
    }

    /// True if the run changed nothing.
    pub fn is_noop(&self) -> bool {
        self.classes_added == 0
            && self.classes_removed == 0
            && self.fields_added == 0
            && self.fields_removed == 0
    }
}

impl std::fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "classes +{}/-{}, fields +{}/-{}",
            self.classes_added, self.classes_removed, self.fields_added, self.fields_removed
        )
    }
}
