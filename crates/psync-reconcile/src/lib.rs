//! # psync-reconcile
//!
//! The reconciliation engine: brings one permission document in sync with
//! the scanned local entity set under a policy.
//!
//! Two structurally identical passes (class access, field permissions),
//! each in three phases that never interleave index mutation with index
//! lookup:
//!
//! 1. snapshot an identity → position index of existing entries,
//! 2. walk local entities — missing ones are appended (add toggle
//!    permitting) with policy-resolved defaults, present ones are checked
//!    off the index untouched,
//! 3. whatever is still in the index has no local counterpart — tombstone
//!    it (remove toggle permitting).
//!
//! Sorting runs per kind after both passes; compaction runs once per
//! document at the very end.
//!
//! Existing entries are never rewritten on a match: reconciliation adds
//! and removes, it does not change values someone set by hand.

pub mod error;
pub mod reconciler;
pub mod report;

pub use error::ReconcileError;
pub use reconciler::{run_profile, Reconciler};
pub use report::ReconcileReport;
