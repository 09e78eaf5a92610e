//! The per-user root config (`~/.fauna-shell`)
//!
//! Holds named endpoints, each a URL plus an account secret, and the name of
//! the default endpoint.

use crate::config::ini::{self, Section, Value};
use crate::config::secret::Secret;
use crate::config::section::TypedSection;
use crate::config::validation::{RESERVED_NAME, validate_endpoint_name};
use crate::error::{Result, ShellError};
use crate::system::System;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub const DEFAULT_URL: &str = "https://db.fauna.com";
pub const DEFAULT_GRAPHQL_HOST: &str = "graphql.fauna.com";
pub const DEFAULT_GRAPHQL_PORT: u16 = 443;

/// Permission bits the root config is written with
pub const ROOT_CONFIG_MODE: u32 = 0o600;

const ENDPOINT_FIELD_NAME: &str = "endpoint";

/// A fully resolved connection target, handed to the database client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    pub secret: String,
    pub url: String,
    pub graphql_host: String,
    pub graphql_port: u16,
}

/// Pieces a URL can be assembled from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub url: Option<&'a str>,
    pub scheme: Option<&'a str>,
    pub domain: Option<&'a str>,
    pub port: Option<u16>,
}

/// One section of the root config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub secret: Secret,
    pub url: String,
    pub graphql_host: String,
    pub graphql_port: u16,
}

impl Endpoint {
    /// An endpoint with the default URL and GraphQL settings
    #[must_use]
    pub fn new(secret: Secret) -> Self {
        Self {
            secret,
            url: DEFAULT_URL.to_owned(),
            graphql_host: DEFAULT_GRAPHQL_HOST.to_owned(),
            graphql_port: DEFAULT_GRAPHQL_PORT,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.url = url;
        }
        self
    }

    #[must_use]
    pub fn with_graphql(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.graphql_host = host;
        }
        if let Some(port) = port {
            self.graphql_port = port;
        }
        self
    }

    /// Build an endpoint from its config section
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The secret is missing, empty, or already scoped
    /// - A value has the wrong type or a port is out of range
    pub fn from_section(section: TypedSection<'_>) -> Result<Self> {
        let secret = Secret::parse(section.str("secret")?)?;
        let url = Self::get_url_from_section(section)?;
        let graphql_host = section.str_opt("graphqlHost")?.map(str::to_owned);
        let graphql_port = port_opt(section, "graphqlPort")?;

        Ok(Self::new(secret)
            .with_url(url)
            .with_graphql(graphql_host, graphql_port))
    }

    /// Assemble a URL from an explicit `url` or from `scheme`/`domain`/`port`
    ///
    /// Returns `None` when none of the parts are given.
    #[must_use]
    pub fn get_url(parts: &UrlParts<'_>) -> Option<String> {
        if let Some(url) = parts.url {
            return Some(url.to_owned());
        }
        if parts.scheme.is_none() && parts.domain.is_none() && parts.port.is_none() {
            return None;
        }

        let scheme = parts.scheme.unwrap_or("https");
        let domain = parts.domain.unwrap_or("db.fauna.com");
        let port = parts
            .port
            .filter(|port| *port != 0)
            .map(|port| format!(":{port}"))
            .unwrap_or_default();
        Some(format!("{scheme}://{domain}{port}"))
    }

    /// Read `url`/`scheme`/`domain`/`port` from a config section or flag set
    ///
    /// # Errors
    ///
    /// Returns an error if a value has the wrong type.
    pub fn get_url_from_section(section: TypedSection<'_>) -> Result<Option<String>> {
        Ok(Self::get_url(&UrlParts {
            url: section.str_opt("url")?,
            scheme: section.str_opt("scheme")?,
            domain: section.str_opt("domain")?,
            port: port_opt(section, "port")?,
        }))
    }

    /// Produce the connection settings for a database below this endpoint
    ///
    /// The stored endpoint is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret cannot be scoped.
    pub fn make_scoped_endpoint(
        &self,
        database_scope: &[String],
        role: Option<&str>,
    ) -> Result<EndpointConfig> {
        let mut secret = self.secret.clone();
        for path in database_scope {
            secret.append_scope(path)?;
        }

        Ok(EndpointConfig {
            secret: secret.build_secret(role),
            url: self.url.clone(),
            graphql_host: self.graphql_host.clone(),
            graphql_port: self.graphql_port,
        })
    }

    /// Serialize, leaving out values equal to their defaults
    #[must_use]
    pub fn to_ini(&self) -> Section {
        let mut section = Section::new();
        section.insert("secret".to_owned(), Value::from(self.secret.key()));
        if self.url != DEFAULT_URL {
            section.insert("url".to_owned(), Value::from(self.url.as_str()));
        }
        if self.graphql_host != DEFAULT_GRAPHQL_HOST {
            section.insert(
                "graphqlHost".to_owned(),
                Value::from(self.graphql_host.as_str()),
            );
        }
        if self.graphql_port != DEFAULT_GRAPHQL_PORT {
            section.insert(
                "graphqlPort".to_owned(),
                Value::Number(i64::from(self.graphql_port)),
            );
        }
        section
    }
}

/// Read a port number, rejecting values outside `0..=65535`
pub(crate) fn port_opt(section: TypedSection<'_>, key: &str) -> Result<Option<u16>> {
    section
        .number_opt(key)?
        .map(|port| {
            u16::try_from(port)
                .map_err(|_| ShellError::invalid_config(format!("Port {key} out of range: {port}")))
        })
        .transpose()
}

/// An endpoint section that could not be loaded, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEndpoint {
    pub name: String,
    pub reason: String,
}

/// Where endpoints live in a root config document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointLayout {
    /// `[endpoint.<name>]` sections
    Nested,
    /// Top-level `[<name>]` sections, as written by older releases
    Legacy,
}

impl EndpointLayout {
    /// Nested when an `endpoint` section exists and has sub-sections
    ///
    /// A legacy file may contain an endpoint literally named `endpoint`; that
    /// section only holds plain values, so it is still read as legacy.
    #[must_use]
    pub fn detect(config: TypedSection<'_>) -> Self {
        match config.object(ENDPOINT_FIELD_NAME) {
            Ok(endpoints) if endpoints.keys().any(|key| endpoints.object_exists(key)) => {
                Self::Nested
            }
            _ => Self::Legacy,
        }
    }
}

/// Represents `~/.fauna-shell`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootConfig {
    pub default_endpoint: Option<String>,
    pub endpoints: BTreeMap<String, Endpoint>,
    invalid_endpoints: Vec<InvalidEndpoint>,
}

impl RootConfig {
    /// Build the root config from a parsed document
    ///
    /// Malformed endpoint sections are collected into `invalid_endpoints`
    /// instead of failing the load.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The default endpoint is named `default` or does not exist
    /// - A nested endpoint section is named `default`
    /// - The endpoint sections themselves are not objects
    pub fn from_section(config: TypedSection<'_>) -> Result<Self> {
        let default_endpoint = config.str_opt(RESERVED_NAME)?.map(str::to_owned);
        let layout = EndpointLayout::detect(config);

        let sections = match layout {
            EndpointLayout::Nested => config.objects_in(ENDPOINT_FIELD_NAME)?,
            EndpointLayout::Legacy => config.all_objects_where(|key| key != RESERVED_NAME)?,
        };

        let mut endpoints = BTreeMap::new();
        let mut invalid_endpoints = Vec::new();
        for (name, section) in sections {
            if name == RESERVED_NAME {
                return Err(ShellError::invalid_config(
                    "Endpoint cannot be named 'default'",
                ));
            }
            match Endpoint::from_section(section) {
                Ok(endpoint) => {
                    endpoints.insert(name.to_owned(), endpoint);
                }
                Err(err) => invalid_endpoints.push(InvalidEndpoint {
                    name: name.to_owned(),
                    reason: err.message().to_owned(),
                }),
            }
        }

        if let Some(default) = default_endpoint.as_deref() {
            if default == RESERVED_NAME {
                return Err(ShellError::invalid_config(
                    "Default endpoint cannot be named 'default'",
                ));
            }
            let known = endpoints.contains_key(default)
                || invalid_endpoints.iter().any(|invalid| invalid.name == default);
            if !known {
                return Err(ShellError::invalid_config(format!(
                    "Default endpoint '{default}' was not found"
                )));
            }
        }

        Ok(Self {
            default_endpoint,
            endpoints,
            invalid_endpoints,
        })
    }

    /// Parse and build the root config from ini text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid ini or the config is invalid.
    pub fn parse(text: &str) -> Result<Self> {
        let document = ini::parse(text)?;
        Self::from_section(TypedSection::new("config key", &document))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Endpoint sections that were skipped while loading
    #[must_use]
    pub fn invalid_endpoints(&self) -> &[InvalidEndpoint] {
        &self.invalid_endpoints
    }

    /// Add or replace an endpoint
    ///
    /// Replacing an endpoint that failed to load clears its invalid entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or reserved.
    pub fn insert_endpoint(&mut self, name: &str, endpoint: Endpoint) -> Result<()> {
        validate_endpoint_name(name)?;
        self.invalid_endpoints.retain(|invalid| invalid.name != name);
        self.endpoints.insert(name.to_owned(), endpoint);
        Ok(())
    }

    /// Remove an endpoint, valid or not, clearing the default if it pointed there
    ///
    /// # Errors
    ///
    /// Returns an error if there is no endpoint with that name.
    pub fn remove_endpoint(&mut self, name: &str) -> Result<()> {
        let was_invalid = self.invalid_endpoints.iter().any(|invalid| invalid.name == name);
        if self.endpoints.remove(name).is_none() && !was_invalid {
            return Err(ShellError::command(format!("No such endpoint '{name}'")));
        }
        self.invalid_endpoints.retain(|invalid| invalid.name != name);
        if self.default_endpoint.as_deref() == Some(name) {
            self.default_endpoint = None;
        }
        Ok(())
    }

    /// Make an existing endpoint the default
    ///
    /// # Errors
    ///
    /// Returns an error if there is no valid endpoint with that name.
    pub fn select_default(&mut self, name: &str) -> Result<()> {
        if !self.endpoints.contains_key(name) {
            return Err(ShellError::command(format!("No such endpoint '{name}'")));
        }
        self.default_endpoint = Some(name.to_owned());
        Ok(())
    }

    /// The on-disk representation, always in the nested layout
    #[must_use]
    pub fn to_ini(&self) -> Section {
        let mut config = Section::new();
        if let Some(default) = self.default_endpoint.as_deref() {
            config.insert(RESERVED_NAME.to_owned(), Value::from(default));
        }
        let endpoints = self
            .endpoints
            .iter()
            .map(|(name, endpoint)| (name.clone(), Value::Section(endpoint.to_ini())))
            .collect::<Section>();
        config.insert(ENDPOINT_FIELD_NAME.to_owned(), Value::Section(endpoints));
        config
    }

    #[must_use]
    pub fn encode(&self) -> String {
        ini::encode(&self.to_ini())
    }

    /// Write the config to `path` with owner-only permissions
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any endpoint failed to load, since saving would drop it
    /// - The file cannot be written
    pub fn save(&self, system: &dyn System, path: &Path) -> Result<()> {
        if !self.invalid_endpoints.is_empty() {
            let details = self
                .invalid_endpoints
                .iter()
                .map(|invalid| format!("  - {}: {}", invalid.name, invalid.reason))
                .collect::<Vec<_>>()
                .join("\n");
            return Err(ShellError::command(format!(
                "Refusing to save {} while it contains invalid endpoints. \
                Fix or remove them first:\n{details}",
                path.display()
            )));
        }

        system
            .write_with_mode(path, self.encode().as_bytes(), ROOT_CONFIG_MODE)
            .map_err(|e| {
                ShellError::filesystem(format!("Failed to write {}: {e}", path.display()))
            })?;
        info!("Saved root config to {}", path.display());
        Ok(())
    }
}
