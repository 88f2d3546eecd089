//! Cross-file object references
//!
//! A reference identifies an object by local file index (0 = same file) and
//! the object id inside that file. The display name and the container label
//! are resolved at most once and cached on the reference itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Where a reference's container lives, filled in by the namer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLabel {
    /// Path of the container file.
    pub path: String,
    /// Bundle the container was loaded from, if any.
    pub bundle_name: Option<String>,
}

/// A reference to an object in this or another asset container.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(from = "ReferenceRepr", into = "ReferenceRepr")]
pub struct AssetReference {
    /// Local file index (0 = the owning container).
    pub file_id: i32,
    /// Object id inside the target container.
    pub path_id: i64,
    label: OnceLock<FileLabel>,
    name: OnceLock<Option<String>>,
}

impl AssetReference {
    #[must_use]
    pub fn new(file_id: i32, path_id: i64) -> Self {
        Self {
            file_id,
            path_id,
            label: OnceLock::new(),
            name: OnceLock::new(),
        }
    }

    /// Create a reference whose display name is already known.
    #[must_use]
    pub fn with_name(file_id: i32, path_id: i64, name: Option<String>) -> Self {
        let reference = Self::new(file_id, path_id);
        let _ = reference.name.set(name.filter(|n| !n.is_empty()));
        reference
    }

    /// The canonical null reference (`0, 0`).
    pub fn is_null(&self) -> bool {
        self.file_id == 0 && self.path_id == 0
    }

    /// The cached display name, if one was resolved.
    pub fn name(&self) -> Option<&str> {
        self.name.get().and_then(|n| n.as_deref())
    }

    /// Whether name resolution already ran (successfully or not).
    pub fn is_name_resolved(&self) -> bool {
        self.name.get().is_some()
    }

    /// Resolve the display name once; later calls return the cached result.
    pub fn name_or_resolve(&self, resolve: impl FnOnce() -> Option<String>) -> Option<&str> {
        self.name
            .get_or_init(|| resolve().filter(|n| !n.is_empty()))
            .as_deref()
    }

    pub fn file_label(&self) -> Option<&FileLabel> {
        self.label.get()
    }

    /// Record the container label. Returns `false` if a label was already set.
    pub fn set_file_label(&self, label: FileLabel) -> bool {
        self.label.set(label).is_ok()
    }
}

impl PartialEq for AssetReference {
    fn eq(&self, other: &Self) -> bool {
        self.file_id == other.file_id && self.path_id == other.path_id
    }
}

impl AssetReference {
    /// Display text with `name` shown in place of the cached name.
    pub fn display_with_name(&self, name: Option<&str>) -> String {
        if self.path_id == 0 {
            return "PPtr(null)".to_string();
        }

        let mut file_text = match self.label.get() {
            Some(label) if !label.path.is_empty() => Path::new(&label.path)
                .file_name()
                .map_or_else(|| label.path.clone(), |n| n.to_string_lossy().into_owned()),
            _ => self.file_id.to_string(),
        };
        if let Some(bundle) = self.label.get().and_then(|l| l.bundle_name.as_deref()) {
            file_text = format!("{bundle}:{file_text}");
        }

        match name.filter(|n| !n.is_empty()) {
            Some(name) => format!("{name}/PPtr({file_text},{})", self.path_id),
            None => format!("PPtr({file_text},{})", self.path_id),
        }
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with_name(self.name()))
    }
}

/// Serialized form used in state machine dumps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceRepr {
    #[serde(rename = "m_FileID", alias = "fileId", default)]
    file_id: i32,
    #[serde(rename = "m_PathID", alias = "pathId", default)]
    path_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl From<ReferenceRepr> for AssetReference {
    fn from(repr: ReferenceRepr) -> Self {
        match repr.name {
            Some(name) => Self::with_name(repr.file_id, repr.path_id, Some(name)),
            None => Self::new(repr.file_id, repr.path_id),
        }
    }
}

impl From<AssetReference> for ReferenceRepr {
    fn from(reference: AssetReference) -> Self {
        Self {
            file_id: reference.file_id,
            path_id: reference.path_id,
            name: reference.name().map(str::to_string),
        }
    }
}
