//! Resolved-dependency manifest (`Package.resolved`)
//!
//! Decodes the pins SwiftPM writes after resolution. Only the fields the
//! mirroring workflow needs are read; everything else in the document is
//! ignored so newer manifest versions keep decoding.

use crate::{MirrorError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// File name of the resolved manifest inside a project root
pub const RESOLVED_MANIFEST_FILE: &str = "Package.resolved";

/// Kind of a resolved pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinKind {
    RemoteSourceControl,
    LocalSourceControl,
    /// Any kind this tool does not know how to mirror
    Other(String),
}

impl From<String> for PinKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "remoteSourceControl" => PinKind::RemoteSourceControl,
            "localSourceControl" => PinKind::LocalSourceControl,
            _ => PinKind::Other(kind),
        }
    }
}

impl<'de> Deserialize<'de> for PinKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(PinKind::from)
    }
}

impl fmt::Display for PinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinKind::RemoteSourceControl => f.write_str("remoteSourceControl"),
            PinKind::LocalSourceControl => f.write_str("localSourceControl"),
            PinKind::Other(kind) => f.write_str(kind),
        }
    }
}

/// One resolved dependency record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub identity: String,
    pub kind: PinKind,
    pub location: String,
    pub revision: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPin {
    identity: String,
    kind: PinKind,
    location: String,
    #[serde(default)]
    revision: Option<String>,
    #[serde(default)]
    state: Option<RawPinState>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPinState {
    #[serde(default)]
    revision: Option<String>,
}

impl From<RawPin> for Pin {
    fn from(raw: RawPin) -> Self {
        let revision = raw
            .revision
            .or_else(|| raw.state.and_then(|state| state.revision));
        Pin {
            identity: raw.identity,
            kind: raw.kind,
            location: raw.location,
            revision,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    pins: Vec<RawPin>,
    #[serde(default)]
    version: Option<u32>,
}

/// Decoded manifest, pins kept in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    pub version: Option<u32>,
    pub pins: Vec<Pin>,
}

impl ResolvedManifest {
    /// Read `Package.resolved` from a project root
    pub fn from_file(project_root: &Path) -> Result<Self> {
        let path = project_root.join(RESOLVED_MANIFEST_FILE);
        let contents = std::fs::read_to_string(&path).map_err(|source| MirrorError::Read {
            path: path.clone(),
            source,
        })?;

        let manifest = Self::decode(&contents).map_err(|source| MirrorError::Decode {
            path: path.clone(),
            source,
        })?;

        debug!(
            path = %path.display(),
            version = ?manifest.version,
            pins = manifest.pins.len(),
            "Loaded resolved manifest"
        );
        Ok(manifest)
    }

    /// Decode manifest text that is already in memory
    pub fn decode(contents: &str) -> std::result::Result<Self, serde_json::Error> {
        let raw: RawManifest = serde_json::from_str(contents)?;
        Ok(Self {
            version: raw.version,
            pins: raw.pins.into_iter().map(Pin::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
  "originHash" : "5d1c8e3f",
  "pins" : [
    {
      "identity" : "swift-argument-parser",
      "kind" : "remoteSourceControl",
      "location" : "https://github.com/apple/swift-argument-parser.git",
      "state" : {
        "revision" : "41982a3656a71c768319979febd796c6fd111d5c",
        "version" : "1.5.0"
      }
    },
    {
      "identity" : "local-kit",
      "kind" : "localSourceControl",
      "location" : "/Users/dev/local-kit",
      "state" : {
        "revision" : "0000000000000000000000000000000000000000"
      }
    },
    {
      "identity" : "registry-thing",
      "kind" : "registry",
      "location" : "example.registry-thing",
      "state" : {
        "version" : "2.0.0"
      }
    }
  ],
  "version" : 3
}"#;

    #[test]
    fn test_decode_preserves_order_and_kinds() {
        let manifest = ResolvedManifest::decode(MANIFEST).unwrap();

        assert_eq!(manifest.version, Some(3));
        let identities: Vec<_> = manifest.pins.iter().map(|p| p.identity.as_str()).collect();
        assert_eq!(
            identities,
            vec!["swift-argument-parser", "local-kit", "registry-thing"]
        );
        assert_eq!(manifest.pins[0].kind, PinKind::RemoteSourceControl);
        assert_eq!(manifest.pins[1].kind, PinKind::LocalSourceControl);
        assert_eq!(
            manifest.pins[2].kind,
            PinKind::Other("registry".to_string())
        );
    }

    #[test]
    fn test_revision_from_state_or_top_level() {
        let manifest = ResolvedManifest::decode(MANIFEST).unwrap();
        assert_eq!(
            manifest.pins[0].revision.as_deref(),
            Some("41982a3656a71c768319979febd796c6fd111d5c")
        );
        assert_eq!(manifest.pins[2].revision, None);

        let flat = r#"{"pins":[{"identity":"A","kind":"remoteSourceControl",
            "location":"https://example.com/org/repo.git","revision":"abc123",
            "state":{"revision":"ignored"}}]}"#;
        let manifest = ResolvedManifest::decode(flat).unwrap();
        assert_eq!(manifest.pins[0].revision.as_deref(), Some("abc123"));
        assert_eq!(manifest.version, None);
    }

    #[test]
    fn test_missing_required_field_is_decode_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(RESOLVED_MANIFEST_FILE),
            r#"{"pins":[{"identity":"A","kind":"remoteSourceControl"}],"version":2}"#,
        )
        .unwrap();

        let err = ResolvedManifest::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, MirrorError::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn test_mistyped_field_is_decode_error() {
        let result = ResolvedManifest::decode(
            r#"{"pins":[{"identity":"A","kind":7,"location":"https://example.com/a"}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = ResolvedManifest::from_file(dir.path()).unwrap_err();
        match err {
            MirrorError::Read { path, .. } => {
                assert_eq!(path, dir.path().join(RESOLVED_MANIFEST_FILE))
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(RESOLVED_MANIFEST_FILE), [0xff, 0xfe, 0x00]).unwrap();
        let err = ResolvedManifest::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, MirrorError::Read { .. }));
    }
}
