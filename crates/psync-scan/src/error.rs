// error.rs — Error types for the source scanning subsystem.

use thiserror::Error;

/// Errors that can occur while discovering local entities.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A source directory could not be listed.
    #[error("cannot read source directory '{path}': {source}")]
    DirUnreadable {
        path: String,
        source: std::io::Error,
    },

    /// A discovered metadata file could not be read.
    #[error("cannot read metadata file '{path}': {source}")]
    FileUnreadable {
        path: String,
        source: std::io::Error,
    },

    /// A discovered metadata file is not well-formed XML.
    #[error("cannot parse metadata file '{path}': {reason}")]
    Unparseable { path: String, reason: String },
}
