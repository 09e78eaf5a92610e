//! Mock system implementation for testing

use super::System;
use std::collections::{HashMap, HashSet};
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Mode given to files written without an explicit mode
const DEFAULT_FILE_MODE: u32 = 0o644;

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem and environment,
/// for fast, isolated unit tests without side effects.
///
/// # Example
/// ```
/// use fauna_shell::system::{mock::MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_home("/home/user")
///     .with_env("FAUNA_SECRET", "fn1234")
///     .with_file("/home/user/.fauna-shell", b"default = local\n");
///
/// assert_eq!(system.env_var("FAUNA_SECRET").unwrap(), "fn1234");
/// assert!(system.exists(Path::new("/home/user/.fauna-shell")));
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    env_vars: HashMap<String, String>,
    current_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    files: HashMap<PathBuf, Vec<u8>>,
    modes: HashMap<PathBuf, u32>,
    dirs: HashSet<PathBuf>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    ///
    /// The current directory is `/` and there is no home directory.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                env_vars: HashMap::new(),
                current_dir: Some(PathBuf::from("/")),
                home_dir: None,
                files: HashMap::new(),
                modes: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
            })),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, MockSystemState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, MockSystemState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set an environment variable (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_env(self, key: &str, value: &str) -> Self {
        self.write_state()
            .env_vars
            .insert(key.to_owned(), value.to_owned());
        self
    }

    /// Set the current working directory (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        {
            let mut state = self.write_state();
            Self::ensure_parent_dirs(&mut state.dirs, dir.as_ref());
            state.current_dir = Some(dir.as_ref().to_path_buf());
        }
        self
    }

    /// Make `current_dir` fail, as when the working directory was deleted
    #[must_use]
    #[inline]
    pub fn without_current_dir(self) -> Self {
        self.write_state().current_dir = None;
        self
    }

    /// Set the home directory (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_home<P: AsRef<Path>>(self, dir: P) -> Self {
        {
            let mut state = self.write_state();
            Self::ensure_parent_dirs(&mut state.dirs, dir.as_ref());
            state.home_dir = Some(dir.as_ref().to_path_buf());
        }
        self
    }

    /// Add a file with contents (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> Self {
        {
            let path_buf = path.as_ref().to_path_buf();
            let mut state = self.write_state();
            if let Some(parent) = path_buf.parent() {
                Self::ensure_parent_dirs(&mut state.dirs, parent);
            }
            state.modes.entry(path_buf.clone()).or_insert(DEFAULT_FILE_MODE);
            state.files.insert(path_buf, contents.to_vec());
        }
        self
    }

    /// Set the permission bits of an existing or future file (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_file_mode<P: AsRef<Path>>(self, path: P, mode: u32) -> Self {
        self.write_state()
            .modes
            .insert(path.as_ref().to_path_buf(), mode);
        self
    }

    /// Add a directory (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> Self {
        Self::ensure_parent_dirs(&mut self.write_state().dirs, path.as_ref());
        self
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

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )
    }

    /// Writes need the parent directory to exist, as on a real filesystem
    fn check_parent(state: &MockSystemState, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent()
            && parent != Path::new("")
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }
        Ok(())
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
        self.read_state()
            .env_vars
            .get(key)
            .cloned()
            .ok_or(VarError::NotPresent)
    }

    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        self.read_state().current_dir.clone().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Current directory is not accessible",
            )
        })
    }

    #[inline]
    fn home_dir(&self) -> Option<PathBuf> {
        self.read_state().home_dir.clone()
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self
            .read_state()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))?;
        String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.write_state();
        Self::check_parent(&state, path)?;

        state
            .modes
            .entry(path.to_path_buf())
            .or_insert(DEFAULT_FILE_MODE);
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    #[inline]
    fn write_with_mode(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        let mut state = self.write_state();
        Self::check_parent(&state, path)?;

        state.modes.insert(path.to_path_buf(), mode);
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        let state = self.read_state();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    #[inline]
    fn is_file(&self, path: &Path) -> bool {
        self.read_state().files.contains_key(path)
    }

    #[inline]
    fn is_dir(&self, path: &Path) -> bool {
        self.read_state().dirs.contains(path)
    }

    #[inline]
    fn file_mode(&self, path: &Path) -> io::Result<Option<u32>> {
        let state = self.read_state();
        if !state.files.contains_key(path) {
            return Err(Self::not_found(path));
        }
        Ok(Some(
            state.modes.get(path).copied().unwrap_or(DEFAULT_FILE_MODE),
        ))
    }
}
