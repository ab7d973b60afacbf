//! Making cargo-installed binaries discoverable through `PATH`
//!
//! `code2prompt` is installed with `cargo install`, which places it in the
//! cargo bin directory. On Windows that directory is frequently missing from
//! `PATH`; this module prepends it for the current process and explains how
//! to make the change permanent. Nothing happens on other platforms.

use crate::system::System;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Platform the discoverability rules are evaluated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Other,
}

impl Platform {
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Other
        }
    }
}

/// What `ensure_discoverable` found or changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStatus {
    /// Not Windows, nothing to do
    NotApplicable,
    /// The bin directory was already on `PATH`
    AlreadyPresent(PathBuf),
    /// The bin directory was prepended to `PATH` for this process
    Added(PathBuf),
    /// The bin directory does not exist, `PATH` left untouched
    MissingDirectory(PathBuf),
    /// The bin directory could not be determined or `PATH` could not be rebuilt
    Unresolved,
}

/// Cargo's bin directory: `$CARGO_HOME/bin`, else `~/.cargo/bin`
#[must_use]
pub fn user_bin_dir(system: &dyn System) -> Option<PathBuf> {
    if let Ok(cargo_home) = system.env_var("CARGO_HOME")
        && !cargo_home.is_empty()
    {
        return Some(PathBuf::from(cargo_home).join("bin"));
    }

    system
        .home_dir()
        .map(|home| home.join(".cargo").join("bin"))
}

/// Ensure the cargo bin directory is on `PATH` for the current platform
///
/// Call once at startup, before any thread is spawned.
pub fn ensure_discoverable(system: &dyn System) -> PathStatus {
    ensure_discoverable_on(system, Platform::current())
}

/// Ensure the cargo bin directory is on `PATH`, evaluated for `platform`
pub fn ensure_discoverable_on(system: &dyn System, platform: Platform) -> PathStatus {
    if platform != Platform::Windows {
        return PathStatus::NotApplicable;
    }

    let Some(bin_dir) = user_bin_dir(system) else {
        warn!("Cannot determine the cargo bin directory; PATH left unchanged.");
        return PathStatus::Unresolved;
    };

    let current = system.env_var("PATH").unwrap_or_default();
    let entries: Vec<PathBuf> = env::split_paths(&current)
        .filter(|entry| !entry.as_os_str().is_empty())
        .collect();

    if entries.iter().any(|entry| entry == &bin_dir) {
        return PathStatus::AlreadyPresent(bin_dir);
    }

    if !system.is_dir(&bin_dir) {
        warn!("Warning: Binary directory {} does not exist.", bin_dir.display());
        return PathStatus::MissingDirectory(bin_dir);
    }

    let updated = match env::join_paths(core::iter::once(bin_dir.clone()).chain(entries)) {
        Ok(updated) => updated,
        Err(err) => {
            warn!("Cannot add {} to PATH: {err}", bin_dir.display());
            return PathStatus::Unresolved;
        }
    };

    system.set_env_var("PATH", &updated.to_string_lossy());
    info!("Added {} to PATH for current session.", bin_dir.display());
    // stderr, outside the log filter; stdout carries generator output only
    eprint!("{}", permanent_instructions(&bin_dir));

    PathStatus::Added(bin_dir)
}

/// Manual steps for making `bin_dir` part of the user's `PATH` for good
#[must_use]
pub fn permanent_instructions(bin_dir: &Path) -> String {
    let dir = bin_dir.display();
    format!(
        "NOTE: For permanent PATH updates, add this directory to your PATH:\n    \
         {dir}\n\
         You can do this by:\n    \
         1. Search for 'Edit environment variables for your account' in Windows\n    \
         2. Edit the PATH variable\n    \
         3. Add the directory above as a new entry\n    \
         4. Restart your command prompt\n\
         Or add this to your PowerShell profile ($PROFILE):\n    \
         $ENV:PATH += \";{dir}\"\n\
         Or for Command Prompt, use:\n    \
         setx PATH \"%PATH%;{dir}\"\n"
    )
}
