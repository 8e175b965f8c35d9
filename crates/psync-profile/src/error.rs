// error.rs — Error types for the profile document subsystem.

use thiserror::Error;

/// Errors that can occur while loading, decoding, or saving a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile file (or directory) could not be read.
    #[error("cannot read profile at '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The profile content is not a valid permission document.
    #[error("cannot parse profile '{profile}': {reason}")]
    Parse { profile: String, reason: String },

    /// The document could not be encoded to XML.
    #[error("cannot encode profile '{profile}': {reason}")]
    Encode { profile: String, reason: String },

    /// The profile file could not be written.
    #[error("cannot write profile to '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}
