use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::foundation::error::{PhotomaskError, PhotomaskResult};

/// Overlay bytes resolved by the caller, ready to hand to the compositor.
///
/// Bytes sit behind an `Arc` so one loaded mask can be shared read-only across many calls.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayAsset {
    /// Identifier used in logs and errors.
    pub id: String,
    /// Encoded image bytes (PNG with alpha in practice).
    pub bytes: Arc<Vec<u8>>,
    /// Fraction of canvas width; `None` falls back to the configured default.
    pub scale: Option<f64>,
}

impl OverlayAsset {
    /// Wrap already-loaded overlay bytes.
    pub fn from_bytes(id: impl Into<String>, bytes: Vec<u8>, scale: Option<f64>) -> Self {
        Self {
            id: id.into(),
            bytes: Arc::new(bytes),
            scale,
        }
    }

    /// Read overlay bytes from a file. A missing file is [`PhotomaskError::AssetNotFound`].
    pub fn from_path(path: &Path, scale: Option<f64>) -> PhotomaskResult<Self> {
        let bytes = read_asset(path)?;
        Ok(Self::from_bytes(path.display().to_string(), bytes, scale))
    }
}

/// One registered mask.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaskEntry {
    /// Lookup key.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Path relative to the store root.
    pub path: String,
    /// Fraction of canvas width the mask should occupy.
    #[serde(default)]
    pub scale: Option<f64>,
}

impl MaskEntry {
    /// Check the scale and rewrite `path` to a canonical `a/b.png` form under the store root.
    ///
    /// The path must stay inside the root and name a file whose extension `image` can decode.
    fn validated(mut self) -> PhotomaskResult<Self> {
        if let Some(scale) = self.scale
            && (!scale.is_finite() || scale <= 0.0)
        {
            return Err(PhotomaskError::config(format!(
                "mask '{}' has invalid scale {scale}",
                self.id
            )));
        }

        let unified = self.path.replace('\\', "/");
        let mut parts = Vec::new();
        for component in Path::new(&unified).components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(PhotomaskError::config(format!(
                        "mask '{}' path '{}' escapes the mask root",
                        self.id, self.path
                    )));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PhotomaskError::config(format!(
                        "mask '{}' path '{}' must be relative to the mask root",
                        self.id, self.path
                    )));
                }
            }
        }
        let Some(file) = parts.last() else {
            return Err(PhotomaskError::config(format!(
                "mask '{}' has an empty path",
                self.id
            )));
        };
        if image::ImageFormat::from_path(file).is_err() {
            return Err(PhotomaskError::config(format!(
                "mask '{}' path '{}' does not name a supported image file",
                self.id, self.path
            )));
        }

        self.path = parts.join("/");
        Ok(self)
    }
}

/// Registry mapping mask ids to overlay files under a root directory.
#[derive(Clone, Debug)]
pub struct MaskStore {
    root: PathBuf,
    entries: Vec<MaskEntry>,
}

impl MaskStore {
    /// Build a store, normalizing entry paths and rejecting duplicate ids.
    pub fn new(root: impl Into<PathBuf>, entries: Vec<MaskEntry>) -> PhotomaskResult<Self> {
        if entries.is_empty() {
            return Err(PhotomaskError::config("mask store needs at least one entry"));
        }
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());
        for entry in entries {
            if !seen.insert(entry.id.clone()) {
                return Err(PhotomaskError::config(format!(
                    "duplicate mask id '{}'",
                    entry.id
                )));
            }
            normalized.push(entry.validated()?);
        }
        Ok(Self {
            root: root.into(),
            entries: normalized,
        })
    }

    /// The single stock mask: id `1`, `masks/1.png`, full canvas width.
    pub fn builtin(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: vec![MaskEntry {
                id: "1".to_string(),
                name: "1".to_string(),
                path: "masks/1.png".to_string(),
                scale: Some(1.0),
            }],
        }
    }

    /// Load entries from a JSON array manifest; paths resolve against the manifest's directory.
    pub fn from_manifest(path: &Path) -> PhotomaskResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read mask manifest '{}'", path.display()))?;
        let entries: Vec<MaskEntry> = serde_json::from_str(&text).map_err(|e| {
            PhotomaskError::config(format!("parse mask manifest '{}': {e}", path.display()))
        })?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Self::new(root, entries)
    }

    /// Root directory entry paths are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All entries in registration order.
    pub fn entries(&self) -> &[MaskEntry] {
        &self.entries
    }

    /// Exact lookup.
    pub fn get(&self, id: &str) -> Option<&MaskEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Lookup that falls back to the first registered mask for unknown ids.
    pub fn resolve(&self, id: &str) -> &MaskEntry {
        self.get(id).unwrap_or(&self.entries[0])
    }

    /// Load the mask registered under `id`.
    pub fn load(&self, id: &str) -> PhotomaskResult<OverlayAsset> {
        let entry = self
            .get(id)
            .ok_or_else(|| PhotomaskError::asset_not_found(format!("unknown mask id '{id}'")))?;
        self.load_entry(entry)
    }

    /// Read the bytes for `entry`.
    pub fn load_entry(&self, entry: &MaskEntry) -> PhotomaskResult<OverlayAsset> {
        let path = self.root.join(Path::new(&entry.path));
        let bytes = read_asset(&path)?;
        tracing::debug!(id = %entry.id, path = %path.display(), len = bytes.len(), "loaded mask");
        Ok(OverlayAsset::from_bytes(entry.id.clone(), bytes, entry.scale))
    }
}

fn read_asset(path: &Path) -> PhotomaskResult<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(PhotomaskError::asset_not_found(
            format!("mask file not found: {}", path.display()),
        )),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("read mask bytes from '{}'", path.display()))
            .into()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
