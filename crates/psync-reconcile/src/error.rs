// error.rs — Error types for the per-profile reconciliation pipeline.

use psync_profile::ProfileError;
use thiserror::Error;

/// Failures at the profile-task boundary.
///
/// One profile failing to load or save aborts that profile's run only;
/// sibling profiles are unaffected and the error surfaces in the final
/// summary.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The profile document could not be loaded.
    #[error("failed to load profile '{profile}': {source}")]
    Load {
        profile: String,
        source: ProfileError,
    },

    /// The reconciled document could not be written back.
    #[error("failed to save profile '{profile}': {source}")]
    Save {
        profile: String,
        source: ProfileError,
    },
}
