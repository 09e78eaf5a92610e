//! The per-project config (`.fauna-project`)

use crate::config::ini::{self, Section, Value};
use crate::config::root::RootConfig;
use crate::config::section::TypedSection;
use crate::config::validation::{RESERVED_NAME, validate_environment_name};
use crate::error::{Result, ShellError};
use crate::system::System;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

const SCHEMA_DIRECTORY_FIELD_NAME: &str = "schema_directory";
const STACK_FIELD_NAME: &str = "stack";
const ENVIRONMENT_FIELD_NAME: &str = "environment";

/// A named database within one of the root config's endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Name of an endpoint in the root config
    pub endpoint: String,
    /// Slash-delimited database path below that endpoint
    pub database: String,
}

/// Older releases call environments stacks
pub type Stack = Environment;

impl Environment {
    /// # Errors
    ///
    /// Returns an error if `endpoint` or `database` is missing or not a string.
    pub fn from_section(section: TypedSection<'_>) -> Result<Self> {
        Ok(Self {
            endpoint: section.str("endpoint")?.to_owned(),
            database: section.str("database")?.to_owned(),
        })
    }

    #[must_use]
    pub fn to_ini(&self) -> Section {
        Section::from([
            ("endpoint".to_owned(), Value::from(self.endpoint.as_str())),
            ("database".to_owned(), Value::from(self.database.as_str())),
        ])
    }
}

/// Represents `.fauna-project`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    pub default_environment: Option<String>,
    pub schema_directory: Option<String>,
    pub environments: BTreeMap<String, Environment>,
}

impl ProjectConfig {
    /// A project config with no environments yet, as written by `project init`
    #[must_use]
    pub fn empty(schema_directory: Option<String>) -> Self {
        Self {
            default_environment: None,
            schema_directory,
            environments: BTreeMap::new(),
        }
    }

    /// Build the project config from a parsed document
    ///
    /// Environments are read from both `[stack.<name>]` and
    /// `[environment.<name>]` sections.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An environment section is malformed
    /// - The same name appears as both a stack and an environment
    /// - The default environment does not exist
    pub fn from_section(config: TypedSection<'_>) -> Result<Self> {
        let default_environment = config.str_opt(RESERVED_NAME)?.map(str::to_owned);
        let schema_directory = config
            .str_opt(SCHEMA_DIRECTORY_FIELD_NAME)?
            .map(str::to_owned);

        let mut environments = BTreeMap::new();
        for field in [STACK_FIELD_NAME, ENVIRONMENT_FIELD_NAME] {
            if !config.object_exists(field) {
                continue;
            }
            for (name, section) in config.objects_in(field)? {
                let environment = Environment::from_section(section).map_err(|e| {
                    ShellError::invalid_config(format!(
                        "Environment '{name}': {}",
                        e.message()
                    ))
                })?;
                if environments.insert(name.to_owned(), environment).is_some() {
                    return Err(ShellError::invalid_config(format!(
                        "Environment '{name}' is defined more than once"
                    )));
                }
            }
        }

        if let Some(default) = default_environment.as_deref()
            && !environments.contains_key(default)
        {
            return Err(ShellError::invalid_config(format!(
                "Default environment '{default}' was not found"
            )));
        }

        Ok(Self {
            default_environment,
            schema_directory,
            environments,
        })
    }

    /// Parse and build the project config from ini text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid ini or the config is invalid.
    pub fn parse(text: &str) -> Result<Self> {
        let document = ini::parse(text)?;
        Self::from_section(TypedSection::new("config key", &document))
    }

    /// Check that every environment points at an endpoint in `root_config`
    ///
    /// # Errors
    ///
    /// Returns an error naming the first environment with a dangling endpoint.
    pub fn validate(&self, root_config: &RootConfig) -> Result<()> {
        for (name, environment) in &self.environments {
            if !root_config.endpoints.contains_key(&environment.endpoint) {
                return Err(ShellError::invalid_config(format!(
                    "Endpoint '{}' used by environment '{name}' not found in ~/.fauna-shell",
                    environment.endpoint
                )));
            }
        }
        Ok(())
    }

    /// Add a new environment
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, reserved, or already taken.
    pub fn add_environment(&mut self, name: &str, environment: Environment) -> Result<()> {
        validate_environment_name(name)?;
        if self.environments.contains_key(name) {
            return Err(ShellError::command(format!(
                "Environment {name} already exists"
            )));
        }
        self.environments.insert(name.to_owned(), environment);
        Ok(())
    }

    /// Make an existing environment the default
    ///
    /// # Errors
    ///
    /// Returns an error if there is no environment with that name.
    pub fn select_default(&mut self, name: &str) -> Result<()> {
        if !self.environments.contains_key(name) {
            return Err(ShellError::command(format!(
                "Environment {name} not found in project config. \
                Run `fauna environment list` to see available environments"
            )));
        }
        self.default_environment = Some(name.to_owned());
        Ok(())
    }

    #[must_use]
    pub fn to_ini(&self) -> Section {
        let mut config = Section::new();
        if let Some(schema_directory) = self.schema_directory.as_deref() {
            config.insert(
                SCHEMA_DIRECTORY_FIELD_NAME.to_owned(),
                Value::from(schema_directory),
            );
        }
        if let Some(default) = self.default_environment.as_deref() {
            config.insert(RESERVED_NAME.to_owned(), Value::from(default));
        }
        let environments = self
            .environments
            .iter()
            .map(|(name, environment)| (name.clone(), Value::Section(environment.to_ini())))
            .collect::<Section>();
        config.insert(STACK_FIELD_NAME.to_owned(), Value::Section(environments));
        config
    }

    #[must_use]
    pub fn encode(&self) -> String {
        ini::encode(&self.to_ini())
    }

    /// Write the config to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, system: &dyn System, path: &Path) -> Result<()> {
        system
            .write(path, self.encode().as_bytes())
            .map_err(|e| {
                ShellError::filesystem(format!("Failed to write {}: {e}", path.display()))
            })?;
        info!("Saved project config to {}", path.display());
        Ok(())
    }
}
