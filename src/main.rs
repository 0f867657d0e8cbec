//! zoo-status CLI entry point
//!
//! Walks a model zoo, validates and converts every model, and writes the
//! markdown status report.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use zoo_status::cli::args::Args;
use zoo_status::cli::output::{OutputFormatter, TerminalFormatter};
use zoo_status::version::get_build_info;
use zoo_status::{run_report, ZooConfig};

fn main() -> ExitCode {
    let args = Args::parse();

    if args.build_info {
        println!("{}", get_build_info());
        return ExitCode::SUCCESS;
    }

    init_tracing(&args);

    let config = match ZooConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(3);
        }
    };

    let report = match run_report(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(3);
        }
    };

    let color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
    let output = TerminalFormatter::new(color, args.quiet).format(&report);
    if !output.is_empty() {
        print!("{}", output);
    }

    ExitCode::from(report.summary.exit_code(args.strict))
}

/// Human-readable logs on stderr; `RUST_LOG` overrides the flag-derived level
fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(stderr_layer).init();
}
