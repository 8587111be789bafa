//! uvmgen — UVM testbench generator.
//!
//! # Usage
//!
//! ```text
//! uvmgen -c <config.yaml> -o <dest_dir> [--templates <dir>] [--per-file]
//!        [--agent-template <name>] [--dry-run] [--summary] [-v]
//! ```
//!
//! Exit status: `0` clean run, `1` fatal error, `2` run completed with
//! recoverable problems (missing components, failed writes, aborted passes).

mod commands;

use std::process::ExitCode;

use clap::Parser;

use commands::generate::GenerateArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "uvmgen",
    version,
    about = "Generate a UVM testbench skeleton from a YAML description",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    generate: GenerateArgs,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.generate.run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
