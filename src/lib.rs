//! Fauna shell configuration
//!
//! Resolves which database endpoint a command connects to, from three layers:
//! command-line flags (or `FAUNA_*` variables), the selected environment of a
//! `.fauna-project` file, and the endpoints in `~/.fauna-shell`. Also
//! provides the commands that manage those two files.

pub mod cli;
pub mod config;
pub mod error;
pub mod operations;
pub mod system;

use anyhow::{Context as _, Result};
use cli::{Args, Commands, EndpointCommand, EnvironmentCommand, ProjectCommand};
use config::ini::Section;
use config::{LookupOptions, ShellConfig};
use operations::{InitOptions, NewEnvironment};
use system::System;
use tracing::warn;

/// Run one CLI command and return what it prints
///
/// # Errors
///
/// Returns an error if the config files cannot be loaded or the command fails.
/// Errors raised by the configuration core can be downcast to
/// [`error::ShellError`].
pub fn run(args: Args, system: &dyn System) -> Result<String> {
    match args.command {
        Commands::Resolve(resolve) => {
            let config = load(system, resolve.connection.to_flags())?;
            operations::resolve_endpoint(
                &config,
                LookupOptions {
                    scope: resolve.scope.as_deref(),
                    role: resolve.role.as_deref(),
                },
                resolve.output_format,
            )
        }
        Commands::Endpoint { command } => {
            let mut config = load(system, Section::new())?;
            match command {
                EndpointCommand::Add {
                    name,
                    url,
                    secret,
                    set_default,
                } => operations::add_endpoint(
                    system,
                    &mut config,
                    &name,
                    url.as_deref(),
                    &secret,
                    set_default,
                ),
                EndpointCommand::List => Ok(operations::list_endpoints(&config)),
                EndpointCommand::Remove { name } => {
                    operations::remove_endpoint(system, &mut config, &name)
                }
                EndpointCommand::Select { name } => {
                    operations::select_endpoint(system, &mut config, &name)
                }
            }
        }
        Commands::Environment { command } => {
            let mut config = load(system, Section::new())?;
            match command {
                EnvironmentCommand::Add(env) => operations::add_environment(
                    system,
                    &mut config,
                    NewEnvironment {
                        name: &env.name,
                        endpoint: &env.endpoint,
                        database: &env.database,
                        set_default: env.set_default,
                    },
                ),
                EnvironmentCommand::List => operations::list_environments(&config),
                EnvironmentCommand::Select { name } => {
                    operations::select_environment(system, &mut config, &name)
                }
            }
        }
        Commands::Project {
            command:
                ProjectCommand::Init {
                    dir,
                    schema_directory,
                    name,
                    endpoint,
                    database,
                },
        } => {
            let environment = match (name.as_deref(), endpoint.as_deref(), database.as_deref()) {
                (Some(name), Some(endpoint), Some(database)) => Some((name, endpoint, database)),
                _ => None,
            };
            operations::init_project(
                system,
                Section::new(),
                InitOptions {
                    dir: &dir,
                    schema_directory: schema_directory.as_deref(),
                    environment,
                },
            )
        }
    }
}

/// Read the config and report its non-fatal problems
fn load(system: &dyn System, flags: Section) -> Result<ShellConfig> {
    let config = ShellConfig::read(system, flags).context("Failed to load config")?;
    for warning in config.config_errors(system) {
        warn!("{warning}");
    }
    Ok(config)
}
