//! # psync-profile
//!
//! Permission document model and persistence for psync.
//!
//! A [`ProfileDocument`] is the in-memory form of one profile: an ordered
//! list of class-access entries and an ordered list of field-permission
//! entries. The reconciler mutates it through upsert and tombstone
//! operations; [`ProfileDocument::compact`] physically removes tombstoned
//! entries once per run so positional indices stay valid during a pass.
//!
//! ## Key components
//!
//! - [`ProfileDocument`] / [`ClassAccess`] / [`FieldPermission`] — the
//!   mutable document model.
//! - [`codec`] — XML encode/decode with configurable [`XmlOptions`]
//!   (indent, newline style, declaration header).
//! - [`ProfileStore`] — the durable-storage boundary: one XML file per
//!   profile, all-or-nothing writes.

pub mod codec;
pub mod document;
pub mod error;
pub mod store;

pub use codec::{Newline, XmlOptions};
pub use document::{ClassAccess, FieldPermission, ProfileDocument};
pub use error::ProfileError;
pub use store::ProfileStore;
