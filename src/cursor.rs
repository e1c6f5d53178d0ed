use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Next line to post: index `line` of S{season}E{episode}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub season: u32,
    pub episode: u32,
    pub line: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            season: 1,
            episode: 1,
            line: 0,
        }
    }
}

pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted cursor, or the start of the show if none was saved yet.
    pub fn load(&self) -> Result<Cursor> {
        if !self.path.exists() {
            return Ok(Cursor::default());
        }
        let raw = fs::read(&self.path)
            .with_context(|| format!("failed to read cursor at {}", self.path.display()))?;
        let raw = String::from_utf8_lossy(&raw);
        serde_json::from_str(&raw)
            .with_context(|| format!("malformed cursor file {}", self.path.display()))
    }

    pub fn save(&self, cursor: &Cursor) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create cursor directory {}", parent.display())
            })?;
        }

        let body = serde_json::to_string_pretty(cursor).context("failed to encode cursor")?;
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, body)
            .with_context(|| format!("failed to write cursor to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to replace cursor at {}", self.path.display()))?;
        tracing::debug!(
            season = cursor.season,
            episode = cursor.episode,
            line = cursor.line,
            "cursor saved"
        );
        Ok(())
    }
}
