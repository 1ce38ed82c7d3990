//! JSON archive of generated content, so a brief can be re-rendered without
//! calling the generator again.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    #[serde(default)]
    pub title: String,
    pub content: String,
    /// RFC 3339 timestamp. Older archives may carry any free-form date string.
    #[serde(default)]
    pub generated_at: String,
}

/// Archive error.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The archive holds no content to render.
    #[error("Archive has no content: {}", .0.display())]
    Empty(PathBuf),
}

impl Archive {
    /// Create an archive stamped with the current time.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Write the archive as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ArchiveError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), bytes = self.content.len(), "saved archive");
        Ok(())
    }

    /// Read an archive, rejecting one whose content is blank.
    pub fn load(path: &Path) -> Result<Self, ArchiveError> {
        let json = fs::read_to_string(path)?;
        let archive: Self = serde_json::from_str(&json)?;
        if archive.content.trim().is_empty() {
            return Err(ArchiveError::Empty(path.to_path_buf()));
        }
        info!(path = %path.display(), "loaded archive");
        Ok(archive)
    }
}
