//! Command line arguments.
//!
//! Every option that a CI workflow usually sets also reads an environment
//! variable, so the same binary runs unchanged locally and under Actions.

use clap::Parser;
use std::path::PathBuf;

/// Validate and convert every model in a model zoo, then write a markdown
/// status report.
#[derive(Parser, Debug, Clone)]
#[command(name = "zoo-status", version, about, long_about = None)]
pub struct Args {
    /// Root directory holding the model files [default: models]
    #[arg(long, env = "ZOO_STATUS_MODELS")]
    pub models: Option<PathBuf>,

    /// Directory receiving the report [default: system temp dir]
    #[arg(long, visible_alias = "wiki", env = "ZOO_STATUS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Only report files matching these comma-separated tokens
    #[arg(long, value_delimiter = ',')]
    pub include: Option<Vec<String>>,

    /// Git ref naming the report (refs/tags/X or refs/heads/X)
    #[arg(long = "ref", env = "GITHUB_REF")]
    pub git_ref: Option<String>,

    /// Echo report lines and log debug detail (-vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Walk and count only: no fetch, validation, conversion or report file
    #[arg(long)]
    pub dry_run: bool,

    /// Never fetch placeholder files
    #[arg(long)]
    pub no_fetch: bool,

    /// Python interpreter with onnx and onnx-tf installed [default: python3]
    #[arg(long, env = "ZOO_STATUS_PYTHON")]
    pub python: Option<PathBuf>,

    /// Scratch path for converted artifacts [default: <tmp>/model.pb]
    #[arg(long)]
    pub scratch: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "ZOO_STATUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Exit 1 when any model fails, 2 when there are only warnings
    #[arg(long)]
    pub strict: bool,

    /// Disable colored console output
    #[arg(long)]
    pub no_color: bool,

    /// Print build information and exit
    #[arg(long)]
    pub build_info: bool,
}

impl Args {
    /// Console log filter for these flags
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
