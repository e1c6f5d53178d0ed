use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::info;

use super::chunk::split_chunks;
use super::episode::{SeasonTable, format_post_text, read_episode_lines};
use super::poster::Poster;
use crate::cursor::{Cursor, CursorStore};
use crate::paths::episode_file_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CycleOutcome {
    pub(crate) posted: Cursor,
    pub(crate) chunks: usize,
    pub(crate) rollovers: u64,
}

pub(crate) struct Engine<P> {
    table: SeasonTable,
    scripts_root: PathBuf,
    store: CursorStore,
    poster: P,
    max_chunk_len: usize,
    cursor: Cursor,
}

impl<P: Poster> Engine<P> {
    /// Loads the persisted cursor and checks it against the season table.
    pub(crate) fn open(
        table: SeasonTable,
        scripts_root: PathBuf,
        store: CursorStore,
        poster: P,
        max_chunk_len: usize,
    ) -> Result<Self> {
        let cursor = store.load()?;
        if !table.contains(&cursor) {
            bail!(
                "cursor S{}E{} in {} is outside the season table",
                cursor.season,
                cursor.episode,
                store.path().display()
            );
        }
        info!(
            season = cursor.season,
            episode = cursor.episode,
            line = cursor.line,
            "resuming"
        );
        Ok(Self {
            table,
            scripts_root,
            store,
            poster,
            max_chunk_len,
            cursor,
        })
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[cfg(test)]
    pub(crate) fn poster(&self) -> &P {
        &self.poster
    }

    /// Posts the next line, rolling over exhausted episodes first. The cursor
    /// only moves past a line once the poster has accepted it.
    pub(crate) fn run_once(&mut self) -> Result<CycleOutcome> {
        let mut rollovers = 0_u64;
        loop {
            let current = self.cursor;
            let path = episode_file_path(&self.scripts_root, current.season, current.episode);
            if !path.is_file() {
                bail!("missing episode file: {}", path.display());
            }
            let lines = read_episode_lines(&path)?;

            let Some(line) = lines.get(current.line) else {
                if rollovers >= self.table.total_episodes() {
                    bail!(
                        "no postable lines anywhere under {}",
                        self.scripts_root.display()
                    );
                }
                let next = self.table.next_episode(&current);
                self.store.save(&next)?;
                self.cursor = next;
                rollovers += 1;
                info!(
                    from = %format!("S{}E{}", current.season, current.episode),
                    to = %format!("S{}E{}", next.season, next.episode),
                    "episode finished"
                );
                continue;
            };

            let text = format_post_text(current.season, current.episode, line);
            let chunks = split_chunks(&text, self.max_chunk_len);
            self.poster.post_thread(&chunks)?;

            let next = Cursor {
                line: current.line + 1,
                ..current
            };
            self.store.save(&next)?;
            self.cursor = next;
            info!(
                season = current.season,
                episode = current.episode,
                line = current.line,
                "posted"
            );
            return Ok(CycleOutcome {
                posted: current,
                chunks: chunks.len(),
                rollovers,
            });
        }
    }

    /// Posts forever, sleeping `interval` between lines. Returns only on error.
    pub(crate) fn run_continuous(&mut self, interval: Duration) -> Result<()> {
        loop {
            self.run_once()?;
            info!(secs = interval.as_secs(), "sleeping until next post");
            thread::sleep(interval);
        }
    }
}
