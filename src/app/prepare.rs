use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::episode::split_script_lines;
use crate::paths::{episode_file_path, manifest_file_path};

const SEASON_DIR_PATTERN: &str = r"(?i)^SEASON\s+(\d+)$";
const EPISODE_NUMBER_PATTERN: &str = r"(?i)Episode\s+(\d+)";
const CREDIT_PREFIXES: [&str; 3] = ["written by", "directed by", "produced by"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ManifestEntry {
    pub(crate) season: u32,
    pub(crate) episode: u32,
    pub(crate) source_path: String,
    pub(crate) output_path: String,
    pub(crate) line_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PrepareSummary {
    pub(crate) lines: usize,
    pub(crate) manifest: Vec<ManifestEntry>,
}

/// Dialogue lines of a raw script, with headers, scene markers and credits removed.
pub(crate) fn clean_script(raw: &str) -> Vec<String> {
    split_script_lines(raw)
        .map(str::trim)
        .filter(|line| is_dialogue(line))
        .map(str::to_string)
        .collect()
}

fn is_dialogue(line: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    if is_all_caps(line) && line.chars().count() > 30 {
        return false;
    }
    if line.starts_with("INT.") || line.starts_with("EXT.") {
        return false;
    }
    let lowered = line.to_lowercase();
    !CREDIT_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

/// At least one cased letter and no lowercase ones.
fn is_all_caps(line: &str) -> bool {
    let mut saw_upper = false;
    for ch in line.chars() {
        if ch.is_lowercase() {
            return false;
        }
        saw_upper |= ch.is_uppercase();
    }
    saw_upper
}

pub(crate) fn prepare_corpus(raw_root: &Path, scripts_root: &Path) -> Result<PrepareSummary> {
    let season_re = Regex::new(SEASON_DIR_PATTERN).context("invalid season pattern")?;
    let episode_re = Regex::new(EPISODE_NUMBER_PATTERN).context("invalid episode pattern")?;

    let season_dirs = find_season_dirs(raw_root, &season_re)?;
    if season_dirs.is_empty() {
        bail!("no season folders found under {}", raw_root.display());
    }

    fs::create_dir_all(scripts_root).with_context(|| {
        format!("failed to create scripts root {}", scripts_root.display())
    })?;

    let mut manifest = Vec::new();
    let mut total_lines = 0;
    for (season, season_dir) in season_dirs {
        for source in episode_files(&season_dir)? {
            let file_name = source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let Some(episode) = capture_number(&episode_re, &file_name) else {
                warn!(file = %file_name, "skipping file with no episode number");
                continue;
            };

            let raw = fs::read(&source)
                .with_context(|| format!("failed to read {}", source.display()))?;
            let lines = clean_script(&String::from_utf8_lossy(&raw));

            let output = episode_file_path(scripts_root, season, episode);
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create episode directory {}", parent.display())
                })?;
            }
            fs::write(&output, lines.join("\n"))
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(season, episode, lines = lines.len(), "wrote episode");

            total_lines += lines.len();
            manifest.push(ManifestEntry {
                season,
                episode,
                source_path: source.display().to_string(),
                output_path: output.display().to_string(),
                line_count: lines.len(),
            });
        }
    }

    let manifest_path = manifest_file_path(scripts_root);
    let body = serde_json::to_string_pretty(&manifest).context("failed to encode manifest")?;
    fs::write(&manifest_path, body)
        .with_context(|| format!("failed to write manifest {}", manifest_path.display()))?;

    Ok(PrepareSummary {
        lines: total_lines,
        manifest,
    })
}

fn find_season_dirs(raw_root: &Path, season_re: &Regex) -> Result<Vec<(u32, PathBuf)>> {
    let entries = fs::read_dir(raw_root)
        .with_context(|| format!("failed to list raw root {}", raw_root.display()))?;

    let mut seasons = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to list raw root {}", raw_root.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(season) = capture_number(season_re, &name) {
            seasons.push((season, path));
        }
    }
    seasons.sort_by_key(|(season, _)| *season);
    Ok(seasons)
}

fn episode_files(season_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(season_dir)
        .with_context(|| format!("failed to list season folder {}", season_dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to list season folder {}", season_dir.display()))?
            .path();
        let hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        if !hidden && path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort_by(|left, right| left.file_name().cmp(&right.file_name()));
    Ok(files)
}

fn capture_number(re: &Regex, haystack: &str) -> Option<u32> {
    re.captures(haystack)?.get(1)?.as_str().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_script_drops_metadata_lines() {
        let raw = "\
            WRITTEN BY Mike Judge\n\
            \n\
            INT. HACKER HOSTEL - KITCHEN - DAY\n\
            EXT. HOOLI CAMPUS - NIGHT\n\
            THE CAMERA PANS ACROSS THE EMPTY GARAGE SLOWLY\n\
            Directed by someone\n\
            produced by someone else\n\
            OKAY.\n\
            \x20  I'm not a big fan of the word 'crush'.  \n\
            Interior decorating is hard.\n";

        assert_eq!(
            clean_script(raw),
            vec![
                "OKAY.".to_string(),
                "I'm not a big fan of the word 'crush'.".to_string(),
                "Interior decorating is hard.".to_string(),
            ]
        );
    }

    #[test]
    fn clean_script_splits_carriage_return_only_files() {
        assert_eq!(
            clean_script("Hello there.\rINT. GARAGE - DAY\rBye."),
            vec!["Hello there.".to_string(), "Bye.".to_string()]
        );
    }

    #[test]
    fn episode_files_skip_hidden_and_non_txt_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Episode 2.txt"), "b").expect("episode 2");
        fs::write(dir.path().join(".Episode 1.txt"), "hidden").expect("hidden episode");
        fs::write(dir.path().join("Episode 1.txt"), "a").expect("episode 1");
        fs::write(dir.path().join("Episode 3.md"), "c").expect("markdown");

        let names = episode_files(dir.path())
            .expect("list episodes")
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Episode 1.txt", "Episode 2.txt"]);
    }

    #[test]
    fn short_shouting_is_kept_and_long_shouting_dropped() {
        assert!(is_dialogue("WHAT ARE YOU DOING?"));
        assert!(!is_dialogue("A VERY LONG UPPERCASE STAGE DIRECTION HERE"));
        assert!(is_dialogue("1234567890 1234567890 1234567890 12345"));
    }

    #[test]
    fn all_caps_requires_a_cased_letter() {
        assert!(is_all_caps("HELLO, WORLD"));
        assert!(!is_all_caps("Hello"));
        assert!(!is_all_caps("12345 !!"));
    }

    #[test]
    fn capture_number_matches_case_insensitively() {
        let season_re = Regex::new(SEASON_DIR_PATTERN).expect("season regex");
        let episode_re = Regex::new(EPISODE_NUMBER_PATTERN).expect("episode regex");

        assert_eq!(capture_number(&season_re, "Season 3"), Some(3));
        assert_eq!(capture_number(&season_re, "SEASON   12"), Some(12));
        assert_eq!(capture_number(&season_re, "Season 3 extras"), None);
        assert_eq!(
            capture_number(&episode_re, "Silicon Valley - episode 07 - Proof.txt"),
            Some(7)
        );
        assert_eq!(capture_number(&episode_re, "pilot.txt"), None);
    }
}
