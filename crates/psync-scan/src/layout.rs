// layout.rs — Where the source tree keeps its metadata.
//
// Every directory name and file suffix is configuration, not a hardcoded
// constant. The defaults match the conventional layout:
//
//   <root>/profiles/<Name>.profile
//   <root>/classes/<Name>.cls-meta.xml
//   <root>/objects/<Name>.object

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Source tree layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceLayout {
    /// Source root; relative or absolute.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Subdirectory holding permission profiles.
    #[serde(default = "default_profiles_dir")]
    pub profiles_dir: String,

    /// Subdirectory holding class metadata files.
    #[serde(default = "default_classes_dir")]
    pub classes_dir: String,

    /// Subdirectory holding object definition files.
    #[serde(default = "default_objects_dir")]
    pub objects_dir: String,

    /// Suffix of profile files; the profile identity is the file name
    /// with this suffix stripped.
    #[serde(default = "default_profile_suffix")]
    pub profile_suffix: String,

    /// Suffix of per-class metadata files.
    #[serde(default = "default_class_meta_suffix")]
    pub class_meta_suffix: String,

    /// Suffix of object definition files.
    #[serde(default = "default_object_suffix")]
    pub object_suffix: String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            root: default_root(),
            profiles_dir: default_profiles_dir(),
            classes_dir: default_classes_dir(),
            objects_dir: default_objects_dir(),
            profile_suffix: default_profile_suffix(),
            class_meta_suffix: default_class_meta_suffix(),
            object_suffix: default_object_suffix(),
        }
    }
}

impl SourceLayout {
    /// Layout rooted at the given directory, defaults elsewhere.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Directory containing profile files.
    pub fn profiles_path(&self) -> PathBuf {
        self.root.join(&self.profiles_dir)
    }

    /// Directory containing class metadata files.
    pub fn classes_path(&self) -> PathBuf {
        self.root.join(&self.classes_dir)
    }

    /// Directory containing object definition files.
    pub fn objects_path(&self) -> PathBuf {
        self.root.join(&self.objects_dir)
    }
}

// Serde default functions
fn default_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_profiles_dir() -> String {
    "profiles".to_string()
}

fn default_classes_dir() -> String {
    "classes".to_string()
}

fn default_objects_dir() -> String {
    "objects".to_string()
}

fn default_profile_suffix() -> String {
    ".profile".to_string()
}

fn default_class_meta_suffix() -> String {
    ".cls-meta.xml".to_string()
}

fn default_object_suffix() -> String {
    ".object".to_string()
}
