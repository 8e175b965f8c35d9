// error.rs — Error types for the policy subsystem.

use thiserror::Error;

/// Errors that can occur while building a policy resolver.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// An ignore pattern is not a valid regular expression.
    #[error("invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
