//! # fauna
//!
//! Command-line client configuration for Fauna databases.
//!
//! Endpoints (a URL and an account secret) live in `~/.fauna-shell`; a
//! project's `.fauna-project` names environments, each an endpoint plus a
//! database path. Every command resolves the two files together with its
//! flags to decide where to connect.
//!
//! ## Usage
//!
//! ```sh
//! fauna endpoint add local --url http://localhost:8443 --secret secret --set-default
//! fauna project init
//! fauna environment add --name dev --endpoint local --database app --set-default
//! fauna resolve --scope child --role server
//! ```

use clap::Parser as _;
use fauna_shell::cli::Args;
use fauna_shell::error::ShellError;
use fauna_shell::system::RealSystem;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let system = RealSystem::new();
    match fauna_shell::run(args, &system) {
        Ok(output) => {
            println!("{output}");
            std::process::exit(0);
        }
        Err(err) => {
            error!("{err:#}");
            std::process::exit(
                err.downcast_ref::<ShellError>()
                    .map_or(1, ShellError::exit_code),
            );
        }
    }
}
