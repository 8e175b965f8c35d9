// config.rs — Policy configuration structures.
//
// Everything here is plain serde data deserialized from psync.toml.
// Default permission values are always the named-field FieldAccess struct
// so read/write can never be swapped by positional mistake.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The four independent reconciliation switches.
///
/// Any combination of (add/remove) × (class/field) is valid; each switch
/// gates exactly one kind of mutation and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncToggles {
    /// Append class entries for classes missing from the profile.
    #[serde(default = "default_true")]
    pub add_classes: bool,

    /// Remove class entries with no matching local class.
    #[serde(default = "default_true")]
    pub remove_classes: bool,

    /// Append field entries for fields missing from the profile.
    #[serde(default = "default_true")]
    pub add_fields: bool,

    /// Remove field entries with no matching local field.
    #[serde(default)]
    pub remove_fields: bool,
}

impl Default for SyncToggles {
    fn default() -> Self {
        Self {
            add_classes: true,
            remove_classes: true,
            add_fields: true,
            remove_fields: false,
        }
    }
}

/// A read/write permission pair for one field entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAccess {
    pub read: bool,
    pub write: bool,
}

impl Default for FieldAccess {
    fn default() -> Self {
        Self {
            read: true,
            write: false,
        }
    }
}

/// Global default values for newly added entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultAccess {
    /// Enabled flag for newly added class entries.
    #[serde(default)]
    pub class_visibility: bool,

    /// Read/write flags for newly added field entries.
    #[serde(default)]
    pub field_access: FieldAccess,
}

/// Per-profile field-access overrides.
///
/// The two levels the source config used to mix in one object are kept
/// explicitly separate here: `access` is the profile-wide default for new
/// fields, `fields` overrides individual field identities within this
/// profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFieldOverride {
    /// Profile-wide access for newly added fields.
    #[serde(default)]
    pub access: Option<FieldAccess>,

    /// Per-field overrides within this profile, keyed by `Object.Field`.
    #[serde(default)]
    pub fields: HashMap<String, FieldAccess>,
}

/// The two-level field-access override table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldAccessOverrides {
    /// Overrides keyed by profile identity.
    #[serde(default)]
    pub profiles: HashMap<String, ProfileFieldOverride>,

    /// Overrides keyed by bare field identity, applying to every profile.
    #[serde(default)]
    pub fields: HashMap<String, FieldAccess>,
}

/// Which comparator a sort pass uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Case-sensitive 3-way string comparison on identity.
    #[default]
    Lexicographic,
    /// ASCII case-insensitive comparison, identity as tiebreaker.
    CaseInsensitive,
}

/// Sort configuration for one entry kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub order: SortOrder,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            order: SortOrder::default(),
        }
    }
}

/// Complete policy for one reconciliation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub toggles: SyncToggles,

    #[serde(default)]
    pub defaults: DefaultAccess,

    /// Per-profile overrides of the default class visibility.
    #[serde(default)]
    pub class_visibility: HashMap<String, bool>,

    /// Two-level field-access override table.
    #[serde(default)]
    pub field_access: FieldAccessOverrides,

    /// Identities matching any pattern are excluded from reconciliation
    /// entirely. Applies to class names and qualified field names.
    /// A leading `^` anchors the pattern at the start of the identity;
    /// unanchored patterns match anywhere.
    #[serde(default)]
    pub ignored: Vec<String>,

    #[serde(default)]
    pub sort_classes: SortOptions,

    #[serde(default)]
    pub sort_fields: SortOptions,
}

fn default_true() -> bool {
    true
}
