//! System abstraction for environment, filesystem and process operations
//!
//! This module provides a unified trait for all external system interactions,
//! allowing the clone/invoke lifecycle to be tested with mock implementations.

use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Temporary directory handle that cleans up on drop
///
/// Removal is best-effort: a failure to delete the directory is never
/// reported to the owner of the handle.
///
/// For `RealSystem`, this wraps `tempfile::TempDir` and uses real filesystem.
/// For `MockSystem`, this manages an in-memory temporary directory.
pub trait TempDirHandle {
    /// Get the path to the temporary directory
    fn path(&self) -> &Path;
}

/// An external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a command for `program` with no arguments
    #[must_use]
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument (builder pattern)
    #[must_use]
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments (builder pattern)
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Full argument vector including the program name
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

/// How the standard streams of a child process are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// stdout and stderr are collected and returned
    Capture,
    /// stdout and stderr stay connected to this process' streams
    Inherit,
}

/// Result of a finished child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    /// Captured stdout (empty under `StdioMode::Inherit`)
    pub stdout: Vec<u8>,
    /// Captured stderr (empty under `StdioMode::Inherit`)
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Successful output with the given stdout
    #[must_use]
    pub fn success(stdout: &[u8]) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.to_vec(),
            stderr: Vec::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    #[must_use]
    pub fn failure(code: i32, stderr: &[u8]) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.to_vec(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    #[must_use]
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_owned()
    }
}

/// Unified trait for system operations (environment + filesystem + processes)
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::env`, `std::fs` and `std::process`
/// - `MockSystem`: Test implementation using in-memory storage and scripted commands
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get an environment variable
    fn env_var(&self, key: &str) -> Result<String, VarError>;

    /// Set an environment variable for the current process
    fn set_env_var(&self, key: &str, value: &str);

    /// Get the current user's home directory
    fn home_dir(&self) -> Option<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write bytes to a file, creating it if it doesn't exist
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Recursively create a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and all its contents
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path points to a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a uniquely-named temporary directory that is removed on drop
    ///
    /// `prefix` is prepended to the generated directory name.
    fn create_temp_dir(&self, prefix: &str) -> io::Result<Box<dyn TempDirHandle>>;

    // ==================== Process Operations ====================

    /// Run a command to completion
    ///
    /// Returns an error only when the process could not be started; a
    /// non-zero exit is reported through `CommandOutput::code`.
    fn run_command(&self, command: &CommandSpec, stdio: StdioMode) -> io::Result<CommandOutput>;
}
