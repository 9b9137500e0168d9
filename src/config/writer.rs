use crate::mirror::expand_originals;
use crate::{MirrorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Mirrors file format version understood by SwiftPM
pub const MIRRORS_CONFIG_VERSION: u32 = 1;

/// One `original -> mirror` mapping.
///
/// Fields are declared in sorted key order so the output matches what SwiftPM
/// itself writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfigEntry {
    pub mirror: String,
    pub original: String,
}

/// A SwiftPM `mirrors.json` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorsConfig {
    /// SwiftPM names the entry list `object`
    pub object: Vec<MirrorConfigEntry>,
    pub version: u32,
}

impl MirrorsConfig {
    /// Document pointing at the mirrors as they exist on this machine
    pub fn host(mirrors: &BTreeMap<String, PathBuf>) -> Self {
        Self::build(mirrors.iter().map(|(url, path)| (url, path_string(path))))
    }

    /// Document pointing at the mirrors mounted under `container_root`
    pub fn container(mirrors: &BTreeMap<String, PathBuf>, container_root: &Path) -> Self {
        Self::build(mirrors.iter().map(|(url, path)| {
            let directory = path.file_name().map(Path::new).unwrap_or(Path::new(""));
            (url, path_string(&container_root.join(directory)))
        }))
    }

    fn build<'a>(mirrors: impl Iterator<Item = (&'a String, String)>) -> Self {
        Self {
            object: expand_originals(mirrors)
                .into_iter()
                .map(|(original, mirror)| MirrorConfigEntry { mirror, original })
                .collect(),
            version: MIRRORS_CONFIG_VERSION,
        }
    }

    /// Pretty JSON with a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Overwrite `path` with this document, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let write_error = |source| MirrorError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, json).map_err(write_error)?;

        info!("Wrote mirrors config to {}", path.display());
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
