//! `fauna project init`

use crate::config::ini::Section;
use crate::config::{PROJECT_FILE_NAME, ProjectConfig, ShellConfig, ShellOverrides};
use crate::error::ShellError;
use crate::operations::environment::{NewEnvironment, add_environment};
use crate::system::System;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for `project init`
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions<'a> {
    /// Directory to create `.fauna-project` in, relative to the current directory
    pub dir: &'a str,
    pub schema_directory: Option<&'a str>,
    /// A first environment, made the default
    pub environment: Option<(&'a str, &'a str, &'a str)>,
}

/// Create a `.fauna-project` file
///
/// # Errors
///
/// Returns an error if:
/// - The directory does not exist or already holds a `.fauna-project`
/// - The first environment is invalid
/// - The file cannot be written
#[inline]
pub fn init_project(system: &dyn System, flags: Section, opts: InitOptions<'_>) -> Result<String> {
    let dir = project_dir(system, opts.dir)?;
    if !system.is_dir(&dir) {
        return Err(ShellError::command(format!(
            "Directory {} does not exist",
            dir.display()
        ))
        .into());
    }

    let path = dir.join(PROJECT_FILE_NAME);
    if system.exists(&path) {
        return Err(ShellError::command(
            "Attempted to run init for a directory that already has a .fauna-project.",
        )
        .into());
    }

    let mut config = ShellConfig::read_with_overrides(
        system,
        ShellOverrides {
            flags,
            project_config_path: Some(path.clone()),
            project_config: Some(ProjectConfig::empty(
                opts.schema_directory.map(str::to_owned),
            )),
            ..ShellOverrides::default()
        },
    )
    .context("Failed to load config")?;
    debug!("Initializing project at {}", path.display());

    match opts.environment {
        Some((name, endpoint, database)) => {
            add_environment(
                system,
                &mut config,
                NewEnvironment {
                    name,
                    endpoint,
                    database,
                    set_default: true,
                },
            )?;
        }
        None => config.save_project_config(system)?,
    }

    Ok(format!("Created {}", path.display()))
}

fn project_dir(system: &dyn System, dir: &str) -> Result<PathBuf> {
    let dir = Path::new(dir);
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let current = system
        .current_dir()
        .context("Failed to determine the current directory")?;
    Ok(if dir == Path::new(".") {
        current
    } else {
        current.join(dir)
    })
}
