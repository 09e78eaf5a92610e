//! System abstraction for environment and filesystem operations
//!
//! Every config load and save goes through this trait, so resolution can be
//! exercised against an in-memory filesystem in tests.

use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Unified trait for system operations (environment + filesystem)
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::env`, `std::fs` and `dirs`
/// - `MockSystem`: Test implementation using in-memory storage
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get an environment variable
    fn env_var(&self, key: &str) -> Result<String, VarError>;

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Get the home directory of the current user, if there is one
    fn home_dir(&self) -> Option<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write bytes to a file, creating it if it doesn't exist
    ///
    /// The whole file is replaced in one call.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Write bytes to a file that only gets the permission bits `mode`
    ///
    /// A new file is created with `mode` and an existing one is narrowed to
    /// it before any contents are written.
    fn write_with_mode(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path points to a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if a path points to a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Permission bits of a file (`0o777` mask)
    ///
    /// Returns `Ok(None)` on platforms without Unix permissions.
    fn file_mode(&self, path: &Path) -> io::Result<Option<u32>>;
}
