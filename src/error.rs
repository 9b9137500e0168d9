use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode resolved manifest {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Repository URL has no final path segment: {url}")]
    UnnamedRepository { url: String },

    #[error("Error cloning dependency '{url}' during `{step}`: {reason}")]
    Clone {
        url: String,
        step: String,
        reason: String,
    },

    #[error("Error registering mirror for {original}: {reason}")]
    Registration { original: String, reason: String },

    #[error("Error updating mirror {directory}: `{step}` {reason}")]
    Update {
        directory: PathBuf,
        step: String,
        reason: String,
    },

    #[error("Failed to write mirrors config to {path}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MirrorError {
    /// Whether the error ends the run rather than just the current item
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            MirrorError::UnnamedRepository { .. }
                | MirrorError::Registration { .. }
                | MirrorError::Update { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
