//! JSON configuration source.

use super::ConfigSource;
use crate::document::ClusterDocument;
use crate::error::{LoadError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Inline(String),
}

/// Reads a `ClusterDocument` from a JSON file or an in-memory string.
#[derive(Debug, Clone)]
pub struct JsonSource {
    origin: Origin,
}

impl JsonSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            origin: Origin::File(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Inline(text.into()),
        }
    }
}

impl ConfigSource for JsonSource {
    fn load(&self) -> Result<ClusterDocument> {
        match &self.origin {
            Origin::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                ClusterDocument::from_json(&text)
            }
            Origin::Inline(text) => ClusterDocument::from_json(text),
        }
    }

    fn describe(&self) -> String {
        match &self.origin {
            Origin::File(path) => path.display().to_string(),
            Origin::Inline(_) => "<inline>".to_string(),
        }
    }
}
