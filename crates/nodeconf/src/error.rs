//! Error types for configuration loading.

use std::path::PathBuf;

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse node configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid node configuration: {0}")]
    Validation(String),

    #[error("Registry rejected {node}: {source}")]
    Registry {
        node: String,
        #[source]
        source: corelib::Error,
    },
}

impl LoadError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn registry<N: Into<String>>(node: N, source: corelib::Error) -> Self {
        Self::Registry {
            node: node.into(),
            source,
        }
    }
}
