mod chunk;
mod engine;
mod episode;
mod poster;
mod prepare;


use std::io;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::{Cli, Mode};
use crate::cursor::CursorStore;
use crate::oauth::Credentials;
use crate::paths::absolutize;

use self::engine::Engine;
use self::episode::SeasonTable;
use self::poster::{ApiClient, DryRunPoster, Poster, ThreadPoster};
use self::prepare::prepare_corpus;

pub fn run(cli: Cli) -> Result<()> {
    match cli.mode {
        Mode::Prepare => run_prepare(&cli),
        Mode::Once | Mode::Continue => run_engine(&cli),
    }
}

fn run_prepare(cli: &Cli) -> Result<()> {
    let raw_root = cli
        .raw_root
        .as_deref()
        .context("RAW_ROOT not set; pass --raw-root or set it in .env")?;
    let raw_root = absolutize(raw_root)?;
    let scripts_root = absolutize(&cli.scripts_root)?;

    let summary = prepare_corpus(&raw_root, &scripts_root)?;

    println!("\nDone.");
    println!("Episodes processed: {}", summary.manifest.len());
    println!("Total dialogue lines: {}", summary.lines);
    println!("Scripts output: {}", scripts_root.display());
    Ok(())
}

fn run_engine(cli: &Cli) -> Result<()> {
    let table = SeasonTable::new(cli.seasons.clone())?;
    let scripts_root = absolutize(&cli.scripts_root)?;
    let store = CursorStore::new(absolutize(&cli.state_path)?);

    let poster: Box<dyn Poster> = if cli.dry_run {
        Box::new(DryRunPoster::new(io::stdout()))
    } else {
        let credentials = Credentials::from_env()?;
        Box::new(ThreadPoster::new(ApiClient::new(&cli.api_url, credentials)))
    };

    let mut engine = Engine::open(table, scripts_root, store, poster, cli.max_chunk_len)?;
    match cli.mode {
        Mode::Once => {
            let outcome = engine.run_once()?;
            tracing::info!(
                season = outcome.posted.season,
                episode = outcome.posted.episode,
                line = outcome.posted.line,
                chunks = outcome.chunks,
                rollovers = outcome.rollovers,
                "single post complete"
            );
            Ok(())
        }
        _ => engine.run_continuous(Duration::from_secs(cli.interval_secs)),
    }
}
