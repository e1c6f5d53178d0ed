use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::cursor::Cursor;

/// Episode count per season; index 0 is season 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SeasonTable {
    episodes: Vec<u32>,
}

impl SeasonTable {
    pub(crate) fn new(episodes: Vec<u32>) -> Result<Self> {
        if episodes.is_empty() {
            bail!("season table is empty");
        }
        if let Some(idx) = episodes.iter().position(|count| *count == 0) {
            bail!("season {} has zero episodes in the season table", idx + 1);
        }
        Ok(Self { episodes })
    }

    pub(crate) fn season_count(&self) -> u32 {
        self.episodes.len() as u32
    }

    pub(crate) fn episodes_in(&self, season: u32) -> Option<u32> {
        let idx = usize::try_from(season.checked_sub(1)?).ok()?;
        self.episodes.get(idx).copied()
    }

    pub(crate) fn total_episodes(&self) -> u64 {
        self.episodes.iter().map(|count| u64::from(*count)).sum()
    }

    pub(crate) fn contains(&self, cursor: &Cursor) -> bool {
        match self.episodes_in(cursor.season) {
            Some(count) => cursor.episode >= 1 && cursor.episode <= count,
            None => false,
        }
    }

    /// Position of the first line of the episode after `cursor`'s, wrapping
    /// from the final episode of the final season back to S1E1.
    pub(crate) fn next_episode(&self, cursor: &Cursor) -> Cursor {
        let mut season = cursor.season;
        let mut episode = cursor.episode + 1;
        if episode > self.episodes_in(season).unwrap_or(0) {
            episode = 1;
            season += 1;
            if season > self.season_count() {
                season = 1;
            }
        }
        Cursor {
            season,
            episode,
            line: 0,
        }
    }
}

pub(crate) fn format_post_text(season: u32, episode: u32, line: &str) -> String {
    format!("S{season}E{episode} {line}")
}

/// Non-empty trimmed lines of a prepared episode file.
pub(crate) fn read_episode_lines(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read(path)
        .with_context(|| format!("failed to read episode file {}", path.display()))?;
    Ok(parse_episode_lines(&String::from_utf8_lossy(&raw)))
}

pub(crate) fn parse_episode_lines(raw: &str) -> Vec<String> {
    split_script_lines(raw)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits on every line boundary a script file may use, including a bare
/// `\r` and the Unicode line and paragraph separators. A `\r\n` pair yields
/// an extra empty piece, which callers drop along with blank lines.
pub(crate) fn split_script_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(is_line_break)
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
