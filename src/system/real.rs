//! Real system implementation using `std::env`, `std::fs` and `std::process`

use super::{CommandOutput, CommandSpec, StdioMode, System, TempDirHandle};
use std::env::VarError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::debug;

/// Production implementation of System trait
///
/// This implementation directly delegates to the standard library's
/// environment, filesystem and process functions.
#[derive(Debug, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        return Self;
    }
}

impl Default for RealSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Temporary directory on the real filesystem
struct RealTempDir {
    path: PathBuf,
    inner: Option<TempDir>,
}

impl TempDirHandle for RealTempDir {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RealTempDir {
    fn drop(&mut self) {
        if let Some(dir) = self.inner.take()
            && let Err(err) = dir.close()
        {
            debug!(
                "Ignoring failure to remove temporary directory {}: {err}",
                self.path.display()
            );
        }
    }
}

impl System for RealSystem {
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }

    fn set_env_var(&self, key: &str, value: &str) {
        // SAFETY: only called from the startup path in `main`, before any
        // other thread exists.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_temp_dir(&self, prefix: &str) -> io::Result<Box<dyn TempDirHandle>> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        Ok(Box::new(RealTempDir {
            path: dir.path().to_path_buf(),
            inner: Some(dir),
        }))
    }

    fn run_command(&self, spec: &CommandSpec, stdio: StdioMode) -> io::Result<CommandOutput> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);

        match stdio {
            StdioMode::Capture => {
                let output = command.output()?;
                Ok(CommandOutput {
                    code: output.status.code(),
                    stdout: output.stdout,
                    stderr: output.stderr,
                })
            }
            StdioMode::Inherit => {
                let status = command.status()?;
                Ok(CommandOutput {
                    code: status.code(),
                    ..CommandOutput::default()
                })
            }
        }
    }
}
