//! Command-line configuration
//!
//! `FUNGETTY_LOG` and `FUNGETTY_SEED` supply the log level and PRNG seed when the
//! corresponding flags are absent.

use crate::constants::DEFAULT_SNAPSHOT_LIMIT;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::Level;

const MIB: usize = 1024 * 1024;

/// What the binary does with the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Record the run, then browse it in the debugger
    Tui,
    /// Execute directly against stdin/stdout
    Run,
}

#[derive(Parser, Debug)]
#[command(name = "fungetty", version)]
#[command(about = "Time-travel Befunge-93 debugger", long_about = None)]
#[command(after_help = "Examples:\n  fungetty hello.bf          # Record and step through in the TUI\n  fungetty --run hello.bf    # Just run it")]
struct Cli {
    /// Befunge-93 source file
    program: PathBuf,

    /// Execute directly on stdin/stdout instead of the debugger
    #[arg(short, long)]
    run: bool,

    /// Read program input from this file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long, value_name = "N")]
    max_ticks: Option<u64>,

    /// Seed the PRNG behind `?`
    #[arg(long, env = "FUNGETTY_SEED")]
    seed: Option<u64>,

    /// Snapshot history limit in MiB
    #[arg(long, value_name = "MIB", default_value_t = DEFAULT_SNAPSHOT_LIMIT / MIB)]
    snapshot_limit: usize,

    /// error, warn, info, debug or trace
    #[arg(long = "log", env = "FUNGETTY_LOG", default_value = "warn")]
    log_level: Level,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub program: PathBuf,
    /// Feed program input from this file instead of stdin
    pub input: Option<PathBuf>,
    pub mode: Mode,
    pub max_ticks: Option<u64>,
    pub seed: Option<u64>,
    /// Snapshot history memory limit in bytes
    pub snapshot_limit: usize,
    pub log_level: Level,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            program: cli.program,
            input: cli.input,
            mode: if cli.run { Mode::Run } else { Mode::Tui },
            max_ticks: cli.max_ticks,
            seed: cli.seed,
            snapshot_limit: cli.snapshot_limit.saturating_mul(MIB),
            log_level: cli.log_level,
        }
    }
}

impl Config {
    /// Parse the process's arguments and environment, exiting with usage on error
    pub fn from_args() -> Self {
        Cli::parse().into()
    }

    /// Parse `args`, the first of which is the binary name
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::try_parse_from(args).map(Config::from)
    }
}
