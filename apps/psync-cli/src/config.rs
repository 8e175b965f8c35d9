// config.rs — Top-level configuration from psync.toml.
//
// Everything the run needs comes in through this one value, loaded once
// at startup and passed explicitly into the scanner, resolver, and
// reconciler — there is no ambient configuration anywhere.
//
// Example:
//
//   [source]
//   root = "project/src"
//
//   [policy.toggles]
//   add_classes = true
//   remove_classes = true
//   add_fields = true
//   remove_fields = false
//
//   [policy.defaults]
//   class_visibility = false
//
//   [policy.class_visibility]
//   Admin = true
//
//   [policy.field_access.profiles.Admin.access]
//   read = true
//   write = true
//
//   [policy.field_access.fields."Product.Name"]
//   read = true
//   write = true
//
//   [policy]
//   ignored = ["vendor__", "^Case"]
//
//   [xml]
//   indent = 4
//   newline = "lf"

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use psync_policy::PolicyConfig;
use psync_profile::XmlOptions;
use psync_scan::SourceLayout;

/// Top-level configuration for one psync run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Source tree layout (root, subdirectories, suffixes).
    #[serde(default)]
    pub source: SourceLayout,

    /// Reconciliation policy (toggles, defaults, overrides, ignores).
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Profile document rendering options.
    #[serde(default)]
    pub xml: XmlOptions,
}

impl SyncConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("cannot parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does
    /// not exist. A file that exists but fails to parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let toml = r#"
            [source]
            root = "project/src"
            profiles_dir = "profiles"

            [policy]
            ignored = ["vendor__", "^Case"]

            [policy.toggles]
            remove_fields = true

            [policy.defaults]
            class_visibility = true

            [policy.class_visibility]
            Admin = true

            [policy.field_access.profiles.Admin.access]
            read = true
            write = true

            [policy.field_access.profiles.Admin.fields."Order.ContractId"]
            read = true
            write = true

            [policy.field_access.fields."Product.Name"]
            read = true
            write = true

            [xml]
            indent = 2
            newline = "crlf"
        "#;

        let config: SyncConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.source.root, std::path::PathBuf::from("project/src"));
        assert!(config.policy.toggles.remove_fields);
        assert!(config.policy.defaults.class_visibility);
        assert_eq!(config.policy.ignored.len(), 2);
        assert_eq!(config.policy.class_visibility["Admin"], true);
        assert!(config
            .policy
            .field_access
            .profiles
            .get("Admin")
            .and_then(|p| p.access)
            .map(|a| a.write)
            .unwrap_or(false));
        assert_eq!(config.xml.indent, 2);
        assert_eq!(config.xml.newline, psync_profile::Newline::Crlf);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: SyncConfig = toml::from_str("").unwrap();
        assert!(config.policy.toggles.add_classes);
        assert!(!config.policy.toggles.remove_fields);
        assert_eq!(config.xml.indent, 4);
        assert_eq!(config.source.profile_suffix, ".profile");
    }
}
