// entity.rs — The scan output types.
//
// A LocalEntity is identity plus the attributes that matter for
// reconciliation: fields carry a `required` flag (required fields are
// implicitly accessible and never declared in a profile), classes carry
// the status string from their metadata file. Entities are immutable
// once scanned.

/// What kind of entity a [`LocalEntity`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A class, identified by its bare name (e.g. `OrderService`).
    Class,
    /// An object field, identified by `Object.Field` (e.g. `Order.ContractId`).
    Field,
}

/// One entity discovered in the local source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEntity {
    /// Qualified identity: bare class name or `Object.Field`.
    pub name: String,
    pub kind: EntityKind,
    /// Fields only: whether the object definition marks this field as
    /// required. Always `false` for classes.
    pub required: bool,
    /// Classes only: the status string from the class metadata file
    /// (e.g. "Active"), kept for logging.
    pub status: Option<String>,
}

impl LocalEntity {
    /// A class entity.
    pub fn class(name: impl Into<String>, status: Option<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Class,
            required: false,
            status,
        }
    }

    /// A field entity with its required flag.
    pub fn field(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Field,
            required,
            status: None,
        }
    }
}

/// The result of one full scan pass.
///
/// Logically read-only: the reconciler shares one snapshot across all
/// profile tasks, so nothing here is ever mutated after the scan.
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    pub classes: Vec<LocalEntity>,
    pub fields: Vec<LocalEntity>,
}
