//! `repo2prompt` - Generate LLM prompts from GitHub repositories
//!
//! This library clones a GitHub repository into a temporary directory,
//! optionally narrows it to a subdirectory, and hands it to the external
//! `code2prompt` generator. The temporary clone is always removed afterwards.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod operations;
pub mod system;
pub mod utils;

use anyhow::Result;
use cli::Args;
use config::Config;
use operations::generate::RepoScope;
use operations::invoke::Generation;
use operations::plan::render_plan;
use system::System;

/// Main entry point for the repo2prompt library
///
/// Prints the structured result as pretty JSON on stdout when one is
/// produced.
pub fn run(args: &Args, system: &dyn System) -> Result<()> {
    let config = Config::load(system, args.config.as_deref())?;
    let request = args.to_request(&config.defaults);
    let scope = RepoScope::new(system, config.git_client(), config.generator());

    if args.dry_run {
        print!("{}", render_plan(&request, scope.git(), scope.generator())?);
        return Ok(());
    }

    scope.generator().check_installed(system)?;

    if let Generation::Structured(value) = scope.generate(&request)? {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    Ok(())
}
