//! Resolution of flags, environment, root config and project config into a
//! single endpoint
//!
//! Precedence, highest first:
//! 1. command-line flags (and their `FAUNA_*` environment fallbacks)
//! 2. the selected environment in `.fauna-project`
//! 3. the default endpoint in `~/.fauna-shell`

use crate::config::flags::{self, apply_env_defaults, environment_flag};
use crate::config::ini::{self, Section};
use crate::config::project::{Environment, ProjectConfig};
use crate::config::root::{Endpoint, EndpointConfig, ROOT_CONFIG_MODE, RootConfig, port_opt};
use crate::config::secret::{DEFAULT_ROLE, Secret};
use crate::config::section::TypedSection;
use crate::config::validation::validate_url;
use crate::config::{find_project_config_path, read_file, root_config_path};
use crate::error::{Result, ShellError};
use crate::system::System;
use std::path::{Path, PathBuf};
use tracing::debug;

const NO_ENDPOINT_OR_SECRET: &str = "No endpoint or secret set. Set an endpoint in \
    ~/.fauna-shell, .fauna-project, or pass --endpoint";

/// Raw inputs to a resolution, as parsed documents
#[derive(Debug, Clone, Default)]
pub struct ShellOpts {
    pub flags: Section,
    pub root_config: Section,
    /// `None` when no project file was found
    pub project_config: Option<Section>,
    pub root_config_path: Option<PathBuf>,
    pub project_config_path: Option<PathBuf>,
}

/// Replacements for what `ShellConfig::read` would otherwise load from disk
#[derive(Debug, Clone, Default)]
pub struct ShellOverrides {
    pub flags: Section,
    pub root_config_path: Option<PathBuf>,
    pub project_config_path: Option<PathBuf>,
    /// An in-memory project config, used instead of reading `project_config_path`
    pub project_config: Option<ProjectConfig>,
}

/// Per-call adjustments to the resolved endpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupOptions<'a> {
    /// Database path appended below the environment's database
    pub scope: Option<&'a str>,
    /// Role to connect with; `admin` when not given
    pub role: Option<&'a str>,
}

/// The configuration of one CLI invocation
#[derive(Debug, Clone)]
pub struct ShellConfig {
    flags: Section,
    pub root_config: RootConfig,
    pub project_config: Option<ProjectConfig>,
    root_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,

    secret_flag: Option<Secret>,
    environment_name: Option<String>,
    environment: Option<Environment>,
    endpoint_name: Option<String>,
    /// The selected endpoint with flag overrides applied; a copy, so
    /// `root_config` keeps the values as loaded
    endpoint: Option<Endpoint>,
    uses_fallback_endpoint: bool,
    errors: Vec<String>,
}

impl ShellConfig {
    /// Load both config files and resolve them against `flags`
    ///
    /// Flags missing from `flags` are taken from `FAUNA_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file cannot be read or parsed, or if
    /// resolution fails (see [`ShellConfig::new`]).
    pub fn read(system: &dyn System, flags: Section) -> Result<Self> {
        Self::read_with_overrides(
            system,
            ShellOverrides {
                flags,
                ..ShellOverrides::default()
            },
        )
    }

    /// Like [`ShellConfig::read`], with some inputs replaced
    ///
    /// # Errors
    ///
    /// Returns an error if a config file cannot be read or parsed, or if
    /// resolution fails.
    pub fn read_with_overrides(system: &dyn System, overrides: ShellOverrides) -> Result<Self> {
        let mut flags = overrides.flags;
        apply_env_defaults(&mut flags, system);

        let root_path = match overrides.root_config_path {
            Some(path) => path,
            None => root_config_path(system)?,
        };
        let root_config = if system.exists(&root_path) {
            debug!("Reading root config from {}", root_path.display());
            parse_document(&root_path, &read_file(system, &root_path)?)?
        } else {
            debug!("No root config at {}", root_path.display());
            Section::new()
        };

        let project_path = overrides
            .project_config_path
            .or_else(|| find_project_config_path(system));
        let project_config = match (overrides.project_config, project_path.as_deref()) {
            (Some(config), _) => Some(config.to_ini()),
            (None, Some(path)) => {
                debug!("Reading project config from {}", path.display());
                Some(parse_document(path, &read_file(system, path)?)?)
            }
            (None, None) => None,
        };

        Self::new(ShellOpts {
            flags,
            root_config,
            project_config,
            root_config_path: Some(root_path),
            project_config_path: project_path,
        })
    }

    /// Resolve flags against the root and project config documents
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either document is not a valid config
    /// - The URL flags do not form a valid URL
    /// - An environment is requested but there is no project config
    /// - Both a secret and an environment are given as flags
    pub fn new(opts: ShellOpts) -> Result<Self> {
        let root_config =
            RootConfig::from_section(TypedSection::new("config key", &opts.root_config))?;
        let project_config = opts
            .project_config
            .as_ref()
            .map(|section| ProjectConfig::from_section(TypedSection::new("config key", section)))
            .transpose()?;

        let flag_view = TypedSection::new("flag", &opts.flags);

        let url_flag = Endpoint::get_url_from_section(flag_view)?;
        if let Some(url) = url_flag.as_deref() {
            validate_url(url)?;
        }
        let graphql_host_flag = flag_view.str_opt(flags::GRAPHQL_HOST)?.map(str::to_owned);
        let graphql_port_flag = port_opt(flag_view, flags::GRAPHQL_PORT)?;

        let mut errors = Vec::new();

        let environment_flag = environment_flag(flag_view)?;
        let environment_name = match project_config.as_ref() {
            None => {
                if let Some(name) = environment_flag {
                    return Err(ShellError::resolution(format!(
                        "No .fauna-project was found, so environment '{name}' cannot be used"
                    )));
                }
                None
            }
            Some(project) => environment_flag
                .map(str::to_owned)
                .or_else(|| project.default_environment.clone()),
        };
        let environment = match (project_config.as_ref(), environment_name.as_deref()) {
            (Some(project), Some(name)) => {
                let found = project.environments.get(name).cloned();
                if found.is_none() {
                    errors.push(format!("No such environment '{name}' in .fauna-project"));
                }
                found
            }
            _ => None,
        };

        let endpoint_name = flag_view
            .str_opt(flags::ENDPOINT)?
            .map(str::to_owned)
            .or_else(|| environment.as_ref().map(|env| env.endpoint.clone()))
            .or_else(|| root_config.default_endpoint.clone());

        let secret_literal = flag_view.str_opt(flags::SECRET)?;
        if secret_literal.is_some() && environment_flag.is_some() {
            return Err(ShellError::resolution(
                "Cannot use --secret together with --environment. A secret already \
                determines the database it connects to",
            ));
        }
        let secret_flag = secret_literal.map(Secret::parse_flag).transpose()?;

        let fallback = || {
            Endpoint::new(Secret::placeholder())
                .with_url(url_flag.clone())
                .with_graphql(graphql_host_flag.clone(), graphql_port_flag)
        };

        let mut uses_fallback_endpoint =
            endpoint_name.is_none() || (secret_flag.is_some() && root_config.is_empty());
        let endpoint = if uses_fallback_endpoint {
            Some(fallback())
        } else {
            let stored = endpoint_name
                .as_deref()
                .and_then(|name| root_config.endpoints.get(name));
            match stored {
                Some(stored) => Some(
                    stored
                        .clone()
                        .with_url(url_flag.clone())
                        .with_graphql(graphql_host_flag.clone(), graphql_port_flag),
                ),
                None if secret_flag.is_some() => {
                    uses_fallback_endpoint = true;
                    Some(fallback())
                }
                None => None,
            }
        };

        debug!(
            environment = environment_name.as_deref().unwrap_or("-"),
            endpoint = endpoint_name.as_deref().unwrap_or("-"),
            secret_flag = secret_flag.is_some(),
            fallback = uses_fallback_endpoint,
            "Resolved shell config"
        );

        Ok(Self {
            flags: opts.flags,
            root_config,
            project_config,
            root_config_path: opts.root_config_path,
            project_config_path: opts.project_config_path,
            secret_flag,
            environment_name,
            environment,
            endpoint_name,
            endpoint,
            uses_fallback_endpoint,
            errors,
        })
    }

    /// Check that this invocation has a usable credential and that the
    /// project config only references endpoints that exist
    ///
    /// Project validation is skipped when a secret flag is given and the root
    /// config has no endpoints: in CI the project file may name endpoints
    /// that only exist on developer machines.
    ///
    /// # Errors
    ///
    /// Returns an error if there is neither an endpoint nor a secret flag, or
    /// an environment names an endpoint missing from the root config.
    pub fn validate(&self) -> Result<()> {
        if self.secret_flag.is_none() && (self.uses_fallback_endpoint || self.endpoint.is_none()) {
            return Err(match (self.endpoint_name.as_deref(), self.endpoint.is_none()) {
                (Some(name), true) => ShellError::resolution(format!(
                    "No such endpoint '{name}' in ~/.fauna-shell"
                )),
                _ => ShellError::resolution(NO_ENDPOINT_OR_SECRET),
            });
        }

        let skip_project = self.secret_flag.is_some() && self.root_config.is_empty();
        if let Some(project) = self.project_config.as_ref()
            && !skip_project
        {
            project.validate(&self.root_config)?;
        }
        Ok(())
    }

    /// The endpoint a command should connect to
    ///
    /// With a secret flag, the secret is used as given (plus `opts.scope` and
    /// `opts.role`) and the environment's database is ignored. Otherwise the environment's
    /// database is the base scope and `opts.scope` is appended below it.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the selected environment does
    /// not exist, or the scope cannot be applied to the secret.
    pub fn lookup_endpoint(&self, opts: LookupOptions<'_>) -> Result<EndpointConfig> {
        self.validate()?;

        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or_else(|| ShellError::resolution(NO_ENDPOINT_OR_SECRET))?;

        if let Some(secret) = self.secret_flag.as_ref() {
            let mut secret = secret.clone();
            if let Some(scope) = opts.scope {
                secret.append_scope(scope)?;
            }
            // A literal like `fn123:db:server` is already complete
            let role = if secret.allows_database() {
                Some(opts.role.unwrap_or(DEFAULT_ROLE))
            } else {
                opts.role
            };
            return Ok(EndpointConfig {
                secret: secret.build_secret(role),
                ..endpoint.make_scoped_endpoint(&[], None)?
            });
        }

        if let Some(name) = self.environment_name.as_deref()
            && self.environment.is_none()
        {
            return Err(ShellError::resolution(format!(
                "No such environment '{name}' in .fauna-project"
            )));
        }

        let database: Vec<String> = self
            .environment
            .iter()
            .map(|env| env.database.clone())
            .chain(opts.scope.map(str::to_owned))
            .collect();
        endpoint.make_scoped_endpoint(&database, Some(opts.role.unwrap_or(DEFAULT_ROLE)))
    }

    /// Non-fatal problems to show as warnings
    #[must_use]
    pub fn config_errors(&self, system: &dyn System) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .root_config
            .invalid_endpoints()
            .iter()
            .map(|invalid| {
                format!(
                    "Endpoint '{}' in ~/.fauna-shell is invalid and will be ignored: {}",
                    invalid.name, invalid.reason
                )
            })
            .collect();

        if let Some(path) = self.root_config_path.as_deref() {
            if system.exists(path) {
                match system.file_mode(path) {
                    Ok(Some(mode)) if mode != ROOT_CONFIG_MODE => warnings.push(format!(
                        "{} has permissions {mode:o}, but it should be {ROOT_CONFIG_MODE:o}. \
                        Run `chmod 600 {}` to fix this",
                        path.display(),
                        path.display()
                    )),
                    Ok(_) => {}
                    Err(e) => warnings.push(format!(
                        "Could not check permissions of {}: {e}",
                        path.display()
                    )),
                }
            } else {
                warnings.push(format!(
                    "{} does not exist. Run `fauna endpoint add` to create it",
                    path.display()
                ));
            }
        }

        warnings.extend(self.errors.iter().cloned());
        warnings
    }

    /// Persist `root_config`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any endpoint in the root config failed to load
    /// - This config is not bound to a root config file
    /// - The file cannot be written
    pub fn save_root_config(&self, system: &dyn System) -> Result<()> {
        let path = self
            .root_config_path
            .as_deref()
            .ok_or_else(|| ShellError::command("No root config file to save to"))?;
        self.root_config.save(system, path)
    }

    /// Persist `project_config`
    ///
    /// # Errors
    ///
    /// Returns an error if there is no project config or it cannot be written.
    pub fn save_project_config(&self, system: &dyn System) -> Result<()> {
        let project = self.project_config.as_ref().ok_or_else(|| {
            ShellError::command("No `.fauna-project` found. Create one with `fauna project init`.")
        })?;
        let path = self
            .project_config_path
            .as_deref()
            .ok_or_else(|| ShellError::command("No project config file to save to"))?;
        project.save(system, path)
    }

    /// The flags this config was resolved with
    #[must_use]
    pub fn flags(&self) -> TypedSection<'_> {
        TypedSection::new("flag", &self.flags)
    }

    #[must_use]
    pub const fn secret_flag(&self) -> Option<&Secret> {
        self.secret_flag.as_ref()
    }

    #[must_use]
    pub fn environment_name(&self) -> Option<&str> {
        self.environment_name.as_deref()
    }

    #[must_use]
    pub const fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    #[must_use]
    pub fn endpoint_name(&self) -> Option<&str> {
        self.endpoint_name.as_deref()
    }

    /// The selected endpoint with URL and GraphQL flags applied
    #[must_use]
    pub const fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Whether no stored endpoint was used, only flags
    #[must_use]
    pub const fn uses_fallback_endpoint(&self) -> bool {
        self.uses_fallback_endpoint
    }

    /// Non-fatal problems found while resolving
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn root_config_path(&self) -> Option<&Path> {
        self.root_config_path.as_deref()
    }

    #[must_use]
    pub fn project_config_path(&self) -> Option<&Path> {
        self.project_config_path.as_deref()
    }
}

fn parse_document(path: &Path, text: &str) -> Result<Section> {
    ini::parse(text).map_err(|e| {
        ShellError::invalid_config(format!("{}: {}", path.display(), e.message()))
    })
}
