//! Logger setup behind the crate's logging macros.
//!
//! The macros exported from the crate root ([`crate::info!`],
//! [`crate::warning!`] and friends) forward to the `log` facade. This module
//! installs an `env_logger` backend that writes every record to stderr with
//! the colored bullet prefixes of the CLI, and sets the maximum level from
//! `SPOTIFY_LIKED_LOG` and the `-v`/`-q` flags.
//!
//! Records from this crate are filtered by [`log::max_level`] alone.
//! Third-party crates (`reqwest`, `hyper`) are capped at `warn`.

use std::{env, io::Write};

use colored::Colorize;
use env_logger::{Builder, Target, fmt::Formatter};
use log::{Level, LevelFilter, Record};

/// Environment variable holding the base verbosity.
pub const LOG_ENV: &str = "SPOTIFY_LIKED_LOG";

/// Target used by [`crate::success!`] so the formatter can pick its marker.
pub const SUCCESS_TARGET: &str = "spotify_liked::success";

const CRATE_TARGET: &str = "spotify_liked";

/// Verbosity when neither `SPOTIFY_LIKED_LOG` nor a flag says otherwise.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

/// Installs the stderr logger and applies the process environment level.
///
/// Called once at startup, before any `.env` file is read, so messages from
/// configuration loading are already subject to `-v`/`-q`. Call
/// [`set_level`] again once the full configuration is known.
///
/// # Arguments
///
/// * `verbose` - number of `-v` flags, each raising the level one step
/// * `quiet` - `-q`, which pins the level to `error`
pub fn init(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();
    builder
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter_module(CRATE_TARGET, LevelFilter::Trace)
        .format(write_record);

    // A logger may already be installed when the crate is embedded.
    let _ = builder.try_init();

    let base = env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(DEFAULT_LEVEL);
    set_level(base, verbose, quiet);
}

/// Sets the process-wide maximum level from a base level and the CLI flags.
pub fn set_level(base: LevelFilter, verbose: u8, quiet: bool) {
    log::set_max_level(effective_level(base, verbose, quiet));
}

/// Combines the configured base level with `-v`/`-q`.
///
/// `quiet` wins and yields [`LevelFilter::Error`]. Otherwise every `-v`
/// raises `base` by one step, saturating at [`LevelFilter::Trace`].
pub fn effective_level(base: LevelFilter, verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    let steps = base as usize + verbose as usize;
    LevelFilter::iter()
        .nth(steps)
        .unwrap_or(LevelFilter::Trace)
}

fn marker(level: Level, target: &str) -> &'static str {
    match level {
        Level::Error | Level::Warn => "!",
        Level::Info if target == SUCCESS_TARGET => "✓",
        Level::Info => "o",
        Level::Debug | Level::Trace => "·",
    }
}

fn write_record(buf: &mut Formatter, record: &Record) -> std::io::Result<()> {
    let symbol = marker(record.level(), record.target());
    let colored = match record.level() {
        Level::Error => symbol.red().bold(),
        Level::Warn => symbol.yellow().bold(),
        Level::Info if record.target() == SUCCESS_TARGET => symbol.green().bold(),
        Level::Info => symbol.blue().bold(),
        Level::Debug | Level::Trace => symbol.dimmed(),
    };
    writeln!(buf, "[{}] {}", colored, record.args())
}
