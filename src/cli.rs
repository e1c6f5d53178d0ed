use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser, ValueEnum};

pub const DEFAULT_MAX_CHUNK_LEN: usize = 270;

#[derive(Debug, Parser)]
#[command(
    name = "scriptcast",
    version,
    about = "Post a TV script one line per cycle and remember where it left off"
)]
pub struct Cli {
    /// What to run: post continuously, post once, or build the corpus
    #[arg(value_enum, default_value_t = Mode::Continue)]
    pub mode: Mode,

    /// Raw per-season text files, read by `prepare`
    #[arg(long, env = "RAW_ROOT")]
    pub raw_root: Option<PathBuf>,

    /// Root of the prepared `{season}/{episode}/{episode}.txt` corpus
    #[arg(long, env = "SCRIPTS_ROOT", default_value = "./scripts")]
    pub scripts_root: PathBuf,

    /// Cursor file
    #[arg(long, env = "STATE_PATH", default_value = "./state/cur.json")]
    pub state_path: PathBuf,

    /// Seconds to sleep between posts in continuous mode
    #[arg(long, env = "TWEET_INTERVAL_SECS", default_value_t = 5400)]
    pub interval_secs: u64,

    /// Print posts instead of sending them; anything but `true` posts live
    #[arg(
        long,
        env = "DRY_RUN",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = parse_dry_run
    )]
    pub dry_run: bool,

    /// Episode count per season, in season order
    #[arg(
        long,
        env = "SEASON_TABLE",
        value_delimiter = ',',
        default_value = "8,10,10,10,8,7"
    )]
    pub seasons: Vec<u32>,

    /// Longest single post, in characters
    #[arg(
        long,
        env = "MAX_CHUNK_LEN",
        default_value_t = DEFAULT_MAX_CHUNK_LEN,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_chunk_len: usize,

    /// Endpoint that creates a post
    #[arg(long, env = "POST_API_URL", default_value = "https://api.twitter.com/2/tweets")]
    pub api_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Continue,
    Once,
    Prepare,
}

fn parse_dry_run(raw: &str) -> Result<bool, String> {
    Ok(raw.trim().eq_ignore_ascii_case("true"))
}
