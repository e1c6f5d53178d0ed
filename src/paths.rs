use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub fn episode_file_path(scripts_root: &Path, season: u32, episode: u32) -> PathBuf {
    scripts_root
        .join(season.to_string())
        .join(episode.to_string())
        .join(format!("{episode}.txt"))
}

pub fn manifest_file_path(scripts_root: &Path) -> PathBuf {
    scripts_root.join("manifest.json")
}

/// Absolute form of `path` without requiring it to exist yet.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("unable to resolve working directory")?;
    Ok(cwd.join(path))
}
