//! # Larek Storefront Entry Point
//!
//! ```text
//! larek-storefront [--config <larek.toml>] [--offline]
//! ```
//!
//! The storefront core is single-threaded, so the runtime is too.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use larek_storefront::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "larek-storefront", about = "Веб-ларёк in the terminal")]
struct Args {
    /// Path to larek.toml (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the bundled catalog and accept orders locally
    #[arg(long)]
    offline: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    larek_storefront::init_tracing();

    let options = RunOptions {
        config: args.config,
        offline: args.offline,
    };

    match larek_storefront::run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("larek-storefront: {}", err);
            ExitCode::FAILURE
        }
    }
}
