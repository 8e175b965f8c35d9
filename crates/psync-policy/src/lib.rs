//! # psync-policy
//!
//! Policy configuration and resolution for psync.
//!
//! Decides, per profile and per entity, what the reconciler is allowed to
//! do and which default values newly added entries receive:
//!
//! - [`SyncToggles`] — four independent add/remove switches
//!   (classes × fields).
//! - [`PolicyConfig`] — defaults, per-profile and per-field override
//!   tables, ignore patterns, sort options. Plain serde data, loaded from
//!   `psync.toml` and passed in explicitly — no process-wide state.
//! - [`PolicyResolver`] — the pure lookup layer the reconciler queries.
//!   Ignore patterns are compiled once at construction.
//!
//! ## Override precedence
//!
//! Field access is resolved profile+field > bare field > profile > global
//! default; class visibility is profile > global default.

pub mod config;
pub mod error;
pub mod resolver;

pub use config::{
    DefaultAccess, FieldAccess, FieldAccessOverrides, PolicyConfig, ProfileFieldOverride,
    SortOptions, SortOrder, SyncToggles,
};
pub use error::PolicyError;
pub use resolver::PolicyResolver;
