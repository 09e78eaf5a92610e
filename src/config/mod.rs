//! Configuration management module
//!
//! Loads the root config (`~/.fauna-shell`) and the project config
//! (`.fauna-project`), and resolves them together with command-line flags
//! into the endpoint a command connects to.

pub mod flags;
pub mod ini;
pub mod project;
pub mod root;
pub mod secret;
pub mod section;
pub mod shell;
pub mod validation;

pub use project::{Environment, ProjectConfig, Stack};
pub use root::{Endpoint, EndpointConfig, InvalidEndpoint, RootConfig};
pub use secret::Secret;
pub use section::TypedSection;
pub use shell::{LookupOptions, ShellConfig, ShellOpts, ShellOverrides};

use crate::error::{Result, ShellError};
use crate::system::System;
use std::path::{Path, PathBuf};

/// File name of the per-user config, in the home directory
pub const ROOT_CONFIG_FILE_NAME: &str = ".fauna-shell";

/// File name of the per-project config
pub const PROJECT_FILE_NAME: &str = ".fauna-project";

/// Location of the per-user config
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn root_config_path(system: &dyn System) -> Result<PathBuf> {
    system
        .home_dir()
        .map(|home| home.join(ROOT_CONFIG_FILE_NAME))
        .ok_or_else(|| ShellError::filesystem("Could not determine the home directory"))
}

/// Find `.fauna-project` in the current directory or one of its parents
///
/// Returns `None` when there is none, or when the current directory is not
/// accessible.
#[must_use]
pub fn find_project_config_path(system: &dyn System) -> Option<PathBuf> {
    let current = system.current_dir().ok()?;
    current
        .ancestors()
        .map(|dir| dir.join(PROJECT_FILE_NAME))
        .find(|candidate| system.is_file(candidate))
}

/// Read a config file
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub(crate) fn read_file(system: &dyn System, path: &Path) -> Result<String> {
    system
        .read_to_string(path)
        .map_err(|e| ShellError::filesystem(format!("Failed to read {}: {e}", path.display())))
}
