//! # psync-scan
//!
//! Local entity discovery for psync.
//!
//! Walks a project source tree and extracts the entities that permission
//! profiles can reference: classes (one metadata file per class) and object
//! fields (one definition file per object, each containing an embedded
//! field list). The result is a [`SourceSnapshot`] — an immutable value the
//! reconciler treats as the ground truth of "what exists locally".
//!
//! ## Key components
//!
//! - [`SourceLayout`] — names the source root, subdirectories, and file
//!   suffixes; loaded from configuration, never hardcoded.
//! - [`SourceScanner`] — performs the directory walks and metadata parsing.
//! - [`LocalEntity`] / [`SourceSnapshot`] — the scan output.

pub mod entity;
pub mod error;
pub mod layout;
pub mod scanner;

pub use entity::{EntityKind, LocalEntity, SourceSnapshot};
pub use error::ScanError;
pub use layout::SourceLayout;
pub use scanner::SourceScanner;
