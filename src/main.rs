//! # `repo2prompt`
//!
//! `repo2prompt` pulls a GitHub repository into a temporary directory and
//! generates an LLM prompt from it (or from one of its subdirectories) with
//! `code2prompt`.
//!
//! ## Usage
//!
//! **Basic example:**
//! ```sh
//! repo2prompt https://github.com/user/repo --subdirectory src --include "*.rs,*.md"
//! ```
//!
//! **JSON output:**
//! ```sh
//! repo2prompt https://github.com/user/repo -O json --tokens
//! ```
//!
//! Requires `git` and `code2prompt` (`cargo install code2prompt`) on `PATH`.
//! See `repo2prompt --help` for all options.

use clap::Parser as _;
use repo2prompt::cli::Args;
use repo2prompt::error::PromptError;
use repo2prompt::system::RealSystem;
use repo2prompt::utils::path_env::ensure_discoverable;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // stdout is reserved for generator output, JSON results and dry-run plans
    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let system = RealSystem::new();
    ensure_discoverable(&system);

    match repo2prompt::run(&args, &system) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{}", err);
            std::process::exit(
                err.downcast_ref::<PromptError>()
                    .map_or(1, PromptError::exit_code),
            );
        }
    }
}
