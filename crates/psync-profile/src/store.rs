// store.rs — ProfileStore: the durable-storage boundary for profiles.
//
// One XML file per profile: `<profiles_dir>/<Name><suffix>`. Writes are
// all-or-nothing per file: the document is encoded fully in memory and
// only then written, so a failed encode never truncates an existing
// profile. Different profiles live in disjoint files, which is what lets
// per-profile tasks run without any cross-task locking.

use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::{self, XmlOptions};
use crate::document::ProfileDocument;
use crate::error::ProfileError;

/// Reads and writes permission documents, one file per profile.
pub struct ProfileStore {
    profiles_dir: PathBuf,
    suffix: String,
    xml: XmlOptions,
}

impl ProfileStore {
    /// Store over the given directory with the default `.profile` suffix.
    pub fn new(profiles_dir: impl AsRef<Path>, xml: XmlOptions) -> Self {
        Self {
            profiles_dir: profiles_dir.as_ref().to_path_buf(),
            suffix: ".profile".to_string(),
            xml,
        }
    }

    /// Override the profile file suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Profile identities present in the store, sorted by name.
    pub fn list(&self) -> Result<Vec<String>, ProfileError> {
        let entries = fs::read_dir(&self.profiles_dir).map_err(|source| ProfileError::Read {
            path: self.profiles_dir.display().to_string(),
            source,
        })?;

        let mut profiles = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ProfileError::Read {
                path: self.profiles_dir.display().to_string(),
                source,
            })?;
            let file = entry.file_name().to_string_lossy().into_owned();
            if let Some(name) = file.strip_suffix(&self.suffix) {
                profiles.push(name.to_string());
            }
        }

        profiles.sort();
        Ok(profiles)
    }

    /// Load one profile document.
    pub fn load(&self, name: &str) -> Result<ProfileDocument, ProfileError> {
        let path = self.profile_path(name);
        let xml = fs::read_to_string(&path).map_err(|source| ProfileError::Read {
            path: path.display().to_string(),
            source,
        })?;
        codec::decode(name, &xml)
    }

    /// Write one profile document back to its file.
    pub fn save(&self, doc: &ProfileDocument) -> Result<(), ProfileError> {
        let path = self.profile_path(doc.name());
        let xml = codec::encode(doc, &self.xml)?;
        fs::write(&path, xml).map_err(|source| ProfileError::Write {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(profile = doc.name(), path = %path.display(), "profile saved");
        Ok(())
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.profiles_dir.join(format!("{name}{}", self.suffix))
    }
}
