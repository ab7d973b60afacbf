//! Temporary clones of remote repositories

use crate::error::PromptError;
use crate::system::{CommandSpec, StdioMode, System, TempDirHandle};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of every temporary clone directory
pub const TEMP_DIR_PREFIX: &str = "repo2prompt_";

/// The external git client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitClient {
    pub program: String,
    /// Shallow clone depth, full history when `None`
    pub depth: Option<u32>,
}

impl Default for GitClient {
    fn default() -> Self {
        Self {
            program: "git".to_owned(),
            depth: None,
        }
    }
}

impl GitClient {
    #[must_use]
    pub fn new<S: Into<String>>(program: S, depth: Option<u32>) -> Self {
        Self {
            program: program.into(),
            depth,
        }
    }

    /// Build `git clone [--depth N] [--branch B] <url> <destination>`
    #[must_use]
    pub fn clone_command(&self, url: &str, branch: Option<&str>, destination: &str) -> CommandSpec {
        let mut command = CommandSpec::new(self.program.as_str()).arg("clone");

        if let Some(depth) = self.depth {
            command = command.arg("--depth").arg(depth.to_string());
        }

        if let Some(branch) = branch {
            command = command.arg("--branch").arg(branch);
        }

        command.arg(url).arg(destination)
    }
}

/// One temporary on-disk checkout of a remote repository
///
/// The temporary directory is owned exclusively by this value and removed,
/// best-effort, when it is dropped. `root` is only set once the clone
/// succeeded.
#[non_exhaustive]
pub struct ScopedClone {
    pub url: String,
    pub branch: Option<String>,
    workspace: Option<Box<dyn TempDirHandle>>,
    root: Option<PathBuf>,
}

impl ScopedClone {
    /// Create a clone request; nothing touches the disk yet
    #[must_use]
    pub fn new(url: &str, branch: Option<&str>) -> Self {
        Self {
            url: url.to_owned(),
            branch: branch.map(str::to_owned),
            workspace: None,
            root: None,
        }
    }

    /// Clone the repository into a fresh temporary directory
    ///
    /// The temporary directory stays owned by `self` even when the clone
    /// fails, so it is removed when `self` goes out of scope.
    ///
    /// # Errors
    ///
    /// Returns a clone error if:
    /// - The temporary directory cannot be created
    /// - The git client cannot be started
    /// - The git client exits with a failure (its stderr is the message)
    pub fn clone_repository(&mut self, system: &dyn System, git: &GitClient) -> Result<&Path> {
        let workspace = system.create_temp_dir(TEMP_DIR_PREFIX).map_err(|e| {
            PromptError::clone_failed(format!("Failed to create temporary directory: {e}"))
        })?;
        let destination = workspace.path().to_path_buf();
        self.workspace = Some(workspace);

        let destination_str = destination
            .to_str()
            .ok_or_else(|| {
                PromptError::clone_failed(format!(
                    "Clone path is not valid UTF-8: {}",
                    destination.display()
                ))
            })?;
        let command = git.clone_command(&self.url, self.branch.as_deref(), destination_str);

        debug!("Cloning {} into {}", self.url, destination.display());

        let output = system
            .run_command(&command, StdioMode::Capture)
            .map_err(|e| {
                PromptError::clone_failed(format!(
                    "Failed to execute {}: {e}. Please ensure Git is installed and available in PATH",
                    git.program
                ))
            })?;

        if !output.is_success() {
            return Err(PromptError::clone_failed(format!(
                "Failed to clone repository '{}': {}",
                self.url,
                output.stderr_text()
            ))
            .into());
        }

        debug!("Repository cloned");

        Ok(self.root.insert(destination).as_path())
    }

    /// Root of the checkout, `None` until the clone succeeded
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Temporary directory backing this clone, once created
    #[must_use]
    pub fn workspace_path(&self) -> Option<&Path> {
        self.workspace.as_ref().map(|workspace| workspace.path())
    }
}

impl Drop for ScopedClone {
    fn drop(&mut self) {
        if let Some(path) = self.workspace_path() {
            debug!("Removing temporary clone {}", path.display());
        }
    }
}

/// Resolve an optional subdirectory inside a checkout
///
/// Returns `root` unchanged when `subdirectory` is `None`.
///
/// # Errors
///
/// Returns a not-found error if the joined path does not exist or would
/// leave the checkout.
pub fn resolve_subdirectory(
    system: &dyn System,
    root: &Path,
    subdirectory: Option<&str>,
) -> Result<PathBuf> {
    let Some(subdirectory) = subdirectory else {
        return Ok(root.to_path_buf());
    };

    let missing = || {
        PromptError::not_found(format!(
            "Subdirectory '{subdirectory}' does not exist in the repository"
        ))
    };

    if !crate::utils::path::stays_within(Path::new(subdirectory)) {
        return Err(missing().into());
    }

    let full_path = root.join(subdirectory);
    if !system.exists(&full_path) {
        return Err(missing().into());
    }

    Ok(full_path)
}
