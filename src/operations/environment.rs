//! `fauna environment` commands: manage environments in `.fauna-project`

use crate::config::validation::validate_database_path;
use crate::config::{Environment, ProjectConfig, ShellConfig};
use crate::error::ShellError;
use crate::system::System;
use anyhow::Result;

/// A new environment, as given on the command line
#[derive(Debug, Clone, Copy)]
pub struct NewEnvironment<'a> {
    pub name: &'a str,
    pub endpoint: &'a str,
    pub database: &'a str,
    pub set_default: bool,
}

/// Add an environment to the project config and save it
///
/// # Errors
///
/// Returns an error if:
/// - There is no project config
/// - The name is empty, `default`, or already used
/// - The endpoint is not in the root config
/// - The database path is empty or malformed
/// - The project config cannot be saved
#[inline]
pub fn add_environment(
    system: &dyn System,
    config: &mut ShellConfig,
    new: NewEnvironment<'_>,
) -> Result<String> {
    if !config.root_config.endpoints.contains_key(new.endpoint) {
        return Err(ShellError::command(format!("No such endpoint '{}'", new.endpoint)).into());
    }
    validate_database_path(new.database)?;

    let project = project_mut(config)?;
    project.add_environment(
        new.name,
        Environment {
            endpoint: new.endpoint.to_owned(),
            database: new.database.to_owned(),
        },
    )?;
    if new.set_default {
        project.select_default(new.name)?;
    }
    config.save_project_config(system)?;

    let path = config
        .project_config_path()
        .map_or_else(|| ".fauna-project".to_owned(), |path| path.display().to_string());
    Ok(format!("Saved environment {} to {path}", new.name))
}

/// List environments, marking the default with `*`
///
/// # Errors
///
/// Returns an error if there is no project config.
#[inline]
pub fn list_environments(config: &ShellConfig) -> Result<String> {
    let project = project(config)?;
    let mut lines = vec!["Available environments:".to_owned()];
    lines.extend(project.environments.keys().map(|name| {
        let marker = if project.default_environment.as_deref() == Some(name.as_str()) {
            "* "
        } else {
            "  "
        };
        format!("{marker}{name}")
    }));
    Ok(lines.join("\n"))
}

/// Make an environment the default
///
/// # Errors
///
/// Returns an error if there is no project config, the name is unknown, or
/// the project config cannot be saved.
#[inline]
pub fn select_environment(
    system: &dyn System,
    config: &mut ShellConfig,
    name: &str,
) -> Result<String> {
    project_mut(config)?.select_default(name)?;
    config.save_project_config(system)?;
    Ok(format!("Selected environment {name}"))
}

fn project(config: &ShellConfig) -> Result<&ProjectConfig> {
    config
        .project_config
        .as_ref()
        .ok_or_else(|| no_project().into())
}

fn project_mut(config: &mut ShellConfig) -> Result<&mut ProjectConfig> {
    config
        .project_config
        .as_mut()
        .ok_or_else(|| no_project().into())
}

fn no_project() -> ShellError {
    ShellError::command("No `.fauna-project` found. Create one with `fauna project init`.")
}
