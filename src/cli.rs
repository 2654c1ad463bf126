// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `taskstage`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskstage",
    version,
    about = "Run a target across workspace projects in dependency-ordered stages.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the workspace file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Target to run for every selected project.
    #[arg(long, value_name = "NAME", default_value = "build")]
    pub target: String,

    /// Comma-separated project ids. Defaults to every project defining the
    /// target.
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub projects: Vec<String>,

    /// Named configuration to run the target under.
    #[arg(long, value_name = "NAME")]
    pub configuration: Option<String>,

    /// Flag override forwarded to every task, as `flag=value`. Repeatable.
    #[arg(
        long = "set",
        value_name = "FLAG=VALUE",
        value_parser = parse_override,
        allow_hyphen_values = true
    )]
    pub overrides: Vec<(String, String)>,

    /// Run the tasks of a stage concurrently.
    #[arg(long)]
    pub parallel: bool,

    /// Maximum concurrently running tasks (overrides `[workspace].max_parallel`).
    #[arg(long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Refuse to run if the project graph contains a cycle.
    #[arg(long)]
    pub detect_cycles: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKSTAGE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print stages, commands and outputs without executing anything.
    #[arg(long)]
    pub dry_run: bool,
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

fn parse_override(s: &str) -> Result<(String, String), String> {
    let (flag, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid override '{s}' (expected FLAG=VALUE)"))?;
    let flag = flag.trim().trim_start_matches("--");
    if flag.is_empty() {
        return Err(format!("invalid override '{s}' (empty flag name)"));
    }
    Ok((flag.to_string(), value.to_string()))
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
