//! Command-line arguments
//!
//! Flags are parsed with clap. Config overrides (`--key=value` or
//! `key=value`) are pulled out first since their keys come from the config
//! file and cannot be declared up front.

use crate::config::ConfigError;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG: &str = "config.cfg";

/// Our own long options; every other `--name` is a config override
const OWN_LONG_OPTIONS: &[&str] = &["config", "help", "previous", "run", "version"];

#[derive(Debug, Parser)]
#[command(
    name = "crepl",
    version,
    about = "Type C line by line; an empty line compiles and runs it",
    disable_help_flag = true
)]
pub struct Cli {
    /// Print this message and the config options that can be overridden
    #[arg(short, long)]
    pub help: bool,

    /// Build and run the previously generated file without editing
    #[arg(short, long)]
    pub previous: bool,

    /// Same as --previous
    #[arg(short, long)]
    pub run: bool,

    /// Config file to read
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

impl Cli {
    /// Whether to skip the editor and rebuild the last file
    pub fn rebuild_only(&self) -> bool {
        self.previous || self.run
    }
}

/// Convert raw process arguments to strings.
///
/// Arguments that are not valid UTF-8 cannot be used as overrides.
pub fn collect_args<I>(args: I) -> Result<Vec<String>, ConfigError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|raw| ConfigError::UnsupportedOverrideType(raw.to_string_lossy().into_owned()))
        })
        .collect()
}

/// Split arguments into those for clap and config overrides.
///
/// The program name is always kept. Any `--name` that is not one of our own
/// long options is an override, as is any argument not starting with `-`.
/// Overrides are collected whether or not they carry a value, so a missing
/// `=` surfaces as an arity error from the config store. The value
/// following `-c`/`--config` is never an override.
pub fn split_overrides(args: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut flags = Vec::new();
    let mut overrides = Vec::new();
    let mut expect_value = false;

    for (idx, arg) in args.into_iter().enumerate() {
        if idx == 0 || expect_value {
            expect_value = false;
            flags.push(arg);
            continue;
        }
        if arg == "-c" || arg == "--config" {
            expect_value = true;
            flags.push(arg);
            continue;
        }
        if is_override(&arg) {
            overrides.push(arg);
        } else {
            flags.push(arg);
        }
    }

    (flags, overrides)
}

fn is_override(arg: &str) -> bool {
    match arg.strip_prefix("--") {
        Some(long) => {
            let name = long.split_once('=').map_or(long, |(name, _)| name);
            !OWN_LONG_OPTIONS.contains(&name)
        }
        None => !arg.starts_with('-'),
    }
}
