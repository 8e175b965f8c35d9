// resolver.rs — Pure policy lookups for the reconciler.
//
// The resolver owns the policy config plus the compiled ignore patterns.
// Every method is a pure function of that state; nothing here touches
// the filesystem or mutates anything.

use regex::Regex;

use crate::config::{FieldAccess, PolicyConfig};
use crate::error::PolicyError;

/// Resolves effective visibility/permission values per profile and entity.
pub struct PolicyResolver {
    policy: PolicyConfig,
    ignore: Vec<Regex>,
}

impl PolicyResolver {
    /// Build a resolver, compiling all ignore patterns up front.
    ///
    /// Patterns are regular expressions matched unanchored, so a leading
    /// `^` anchors at the start of the identity and a bare pattern
    /// matches as a substring. A malformed pattern is rejected here
    /// rather than silently never matching.
    pub fn new(policy: PolicyConfig) -> Result<Self, PolicyError> {
        let mut ignore = Vec::with_capacity(policy.ignored.len());
        for pattern in &policy.ignored {
            let compiled = Regex::new(pattern).map_err(|e| PolicyError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            ignore.push(compiled);
        }
        Ok(Self { policy, ignore })
    }

    /// The policy this resolver was built from.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Enabled flag for a class entry newly added to `profile`:
    /// per-profile override if present, else the global default.
    pub fn class_visibility(&self, profile: &str) -> bool {
        self.policy
            .class_visibility
            .get(profile)
            .copied()
            .unwrap_or(self.policy.defaults.class_visibility)
    }

    /// Read/write flags for a field entry newly added to `profile`.
    ///
    /// Precedence: profile+field override > bare field override >
    /// profile override > global default.
    pub fn field_access(&self, profile: &str, field: &str) -> FieldAccess {
        let overrides = &self.policy.field_access;
        let per_profile = overrides.profiles.get(profile);

        if let Some(access) = per_profile.and_then(|p| p.fields.get(field)) {
            return *access;
        }
        if let Some(access) = overrides.fields.get(field) {
            return *access;
        }
        if let Some(access) = per_profile.and_then(|p| p.access) {
            return access;
        }
        self.policy.defaults.field_access
    }

    /// Whether an identity is excluded from reconciliation entirely.
    pub fn is_ignored(&self, identity: &str) -> bool {
        self.ignore.iter().any(|p| p.is_match(identity))
    }
}
