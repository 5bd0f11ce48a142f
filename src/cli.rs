// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `watchrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchrun",
    version,
    about = "Watch a directory tree and rerun a command when matching files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Defaults to `Watchrun.toml` in the current working directory. A
    /// missing config file is not an error; built-in defaults apply.
    #[arg(long, value_name = "PATH", default_value = default_config_path())]
    pub config: String,

    /// Directory to watch.
    ///
    /// Overrides the `directory` value from the config file.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<String>,

    /// Filename patterns, separated by commas or whitespace (e.g. "*.go,*.html").
    ///
    /// Patterns match the basename of a changed file, never its full path.
    /// Overrides the `patterns` value from the config file.
    #[arg(long, value_name = "PATTERNS")]
    pub pattern: Option<String>,

    /// Write the resolved options back to the config file.
    #[arg(long)]
    pub save: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to run and restart on changes, e.g. `watchrun -- go test ./...`.
    ///
    /// When omitted, `watchrun` only watches and logs the changed files.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Split a `--pattern` value on commas and whitespace, dropping empty pieces.
pub fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
