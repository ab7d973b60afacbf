//! Mock system implementation for testing

use tracing::error;

use super::{CommandOutput, CommandSpec, StdioMode, System, TempDirHandle};
use std::collections::{HashMap, HashSet};
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

// Global counter for generating unique temp directory IDs
static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Scripted behavior for one external program
pub type CommandHandler =
    Arc<dyn Fn(&MockSystem, &CommandSpec) -> io::Result<CommandOutput> + Send + Sync>;

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem, environment and scripted
/// external programs for fast, isolated unit tests without side effects.
/// Programs without a registered handler behave as if not installed.
///
/// # Example
/// ```
/// use repo2prompt::system::{mock::MockSystem, CommandOutput, CommandSpec, StdioMode, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_env("HOME", "/home/user").unwrap()
///     .with_file("/test/file.txt", b"Hello, world!").unwrap()
///     .with_command("code2prompt", |_, _| Ok(CommandOutput::success(b"{}"))).unwrap();
///
/// assert_eq!(system.env_var("HOME").unwrap(), "/home/user");
/// assert!(system.exists(Path::new("/test/file.txt")));
///
/// let output = system
///     .run_command(&CommandSpec::new("code2prompt"), StdioMode::Capture)
///     .unwrap();
/// assert!(output.is_success());
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    env_vars: HashMap<String, String>,
    home_dir: Option<PathBuf>,
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    locked: HashSet<PathBuf>,
    commands: HashMap<String, CommandHandler>,
    history: Vec<(CommandSpec, StdioMode)>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                env_vars: HashMap::new(),
                home_dir: None,
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
                locked: HashSet::new(),
                commands: HashMap::new(),
                history: Vec::new(),
            })),
        }
    }

    /// Set an environment variable (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_env(self, key: &str, value: &str) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.env_vars.insert(key.to_owned(), value.to_owned());
        drop(state);
        Ok(self)
    }

    /// Set the home directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_home_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.home_dir = Some(dir.as_ref().to_path_buf());
        drop(state);
        Ok(self)
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }

        state.files.insert(path_buf, contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Add a directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        self.create_dir_all(path.as_ref())?;
        Ok(self)
    }

    /// Make `remove_dir_all` fail for this path and anything beneath it
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_locked_path<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        self.lock_path(path.as_ref())?;
        Ok(self)
    }

    /// Make `remove_dir_all` fail for this path from now on
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn lock_path(&self, path: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.locked.insert(path.to_path_buf());
        drop(state);
        Ok(())
    }

    /// Register the behavior of an external program (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_command<F>(self, program: &str, handler: F) -> io::Result<Self>
    where
        F: Fn(&Self, &CommandSpec) -> io::Result<CommandOutput> + Send + Sync + 'static,
    {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.commands.insert(program.to_owned(), Arc::new(handler));
        drop(state);
        Ok(self)
    }

    /// Commands run so far, in order, with their stdio wiring
    #[must_use]
    pub fn commands_run(&self) -> Vec<(CommandSpec, StdioMode)> {
        self.state
            .read()
            .map(|state| state.history.clone())
            .unwrap_or_default()
    }

    /// Temporary directories that currently exist
    #[must_use]
    pub fn live_temp_dirs(&self) -> Vec<PathBuf> {
        self.state
            .read()
            .map(|state| {
                state
                    .dirs
                    .iter()
                    .filter(|dir| dir.parent() == Some(Path::new("/tmp")))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    #[inline]
    fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor == Path::new("") {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        let state = self.state.read().map_err(|_| VarError::NotPresent)?;
        state.env_vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[inline]
    fn set_env_var(&self, key: &str, value: &str) {
        match self.state.write() {
            Ok(mut state) => {
                state.env_vars.insert(key.to_owned(), value.to_owned());
            }
            Err(e) => error!("Failed to set mock environment variable: {e}"),
        }
    }

    #[inline]
    fn home_dir(&self) -> Option<PathBuf> {
        self.state.read().ok()?.home_dir.clone()
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        let result = bytes.clone();
        drop(state);
        String::from_utf8(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path.parent()
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        drop(state);
        Ok(())
    }

    #[inline]
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Self::ensure_parent_dirs(&mut state.dirs, path);
        drop(state);
        Ok(())
    }

    #[inline]
    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if state.locked.iter().any(|locked| locked.starts_with(path)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Path is locked: {}", path.display()),
            ));
        }

        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", path.display()),
            ));
        }

        state.files.retain(|p, _| !p.starts_with(path));
        state.dirs.retain(|p| !p.starts_with(path));
        drop(state);
        Ok(())
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.files.contains_key(path) || state.dirs.contains(path))
    }

    #[inline]
    fn is_dir(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.dirs.contains(path))
    }

    #[inline]
    fn create_temp_dir(&self, prefix: &str) -> io::Result<Box<dyn TempDirHandle>> {
        let id = TEMP_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_path = PathBuf::from(format!("/tmp/{prefix}mock_{id}"));

        self.create_dir_all(&temp_path)?;

        Ok(Box::new(MockTempDir {
            path: temp_path,
            system: self.clone(),
        }))
    }

    #[inline]
    fn run_command(&self, command: &CommandSpec, stdio: StdioMode) -> io::Result<CommandOutput> {
        // The handler runs without the lock held so it can touch the filesystem
        let handler = {
            let mut state = self
                .state
                .write()
                .map_err(|e| io::Error::other(e.to_string()))?;
            state.history.push((command.clone(), stdio));
            state.commands.get(&command.program).cloned()
        };

        match handler {
            Some(handler) => handler(self, command),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("program not found: {}", command.program),
            )),
        }
    }
}

/// Mock temporary directory handle that cleans up on drop
#[non_exhaustive]
pub struct MockTempDir {
    path: PathBuf,
    system: MockSystem,
}

impl TempDirHandle for MockTempDir {
    #[inline]
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for MockTempDir {
    #[inline]
    fn drop(&mut self) {
        if let Err(e) = self.system.remove_dir_all(&self.path) {
            error!("Failed to remove temporary directory: {e}");
        }
    }
}
