//! Database secrets and their scoping rules

use crate::error::{Result, ShellError};

/// Roles that are appended verbatim; anything else becomes `@role/<name>`
pub const BUILTIN_ROLES: [&str; 4] = ["admin", "client", "server", "server-readonly"];

/// Role used when a scope is present but no role was requested
pub const DEFAULT_ROLE: &str = "admin";

/// A database access key plus an optional database path it is scoped to
///
/// `fn1234` scoped to `["parent", "child"]` with role `server` is sent to the
/// service as `fn1234:parent/child:server`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    key: String,
    allow_database: bool,
    database_scope: Vec<String>,
}

impl Secret {
    /// Parse a secret given on the command line
    ///
    /// The literal is kept as-is. If it already carries a `:` annotation it is
    /// treated as pinned to a database and cannot be scoped further.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty.
    pub fn parse_flag(literal: &str) -> Result<Self> {
        if literal.is_empty() {
            return Err(ShellError::invalid_config("Secret cannot be empty"));
        }
        Ok(Self {
            key: literal.to_owned(),
            allow_database: !literal.contains(':'),
            database_scope: Vec::new(),
        })
    }

    /// Parse a secret stored in a config file
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty or already scoped.
    pub fn parse(literal: &str) -> Result<Self> {
        if literal.is_empty() {
            return Err(ShellError::invalid_config("Secret cannot be empty"));
        }
        if literal.contains(':') {
            return Err(ShellError::invalid_config("Secret cannot be scoped"));
        }
        Ok(Self {
            key: literal.to_owned(),
            allow_database: true,
            database_scope: Vec::new(),
        })
    }

    /// Placeholder secret for endpoints built only to carry URL settings
    pub(crate) const fn placeholder() -> Self {
        Self {
            key: String::new(),
            allow_database: true,
            database_scope: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn allows_database(&self) -> bool {
        self.allow_database
    }

    #[must_use]
    pub fn database_scope(&self) -> &[String] {
        &self.database_scope
    }

    /// Append a `/`-separated database path to the scope
    ///
    /// Empty path segments are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if this secret is already pinned to a database.
    pub fn append_scope(&mut self, path: &str) -> Result<&mut Self> {
        if !self.allow_database {
            return Err(ShellError::scope(
                "Cannot specify database with a secret that contains a database",
            ));
        }
        self.database_scope.extend(
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned),
        );
        Ok(self)
    }

    /// Render the secret string sent to the database service
    ///
    /// A role segment is only added when a scope is present or a role was
    /// asked for, so an unscoped secret without a role stays bare.
    #[must_use]
    pub fn build_secret(&self, role: Option<&str>) -> String {
        let mut secret = self.key.clone();
        if !self.database_scope.is_empty() {
            secret.push(':');
            secret.push_str(&self.database_scope.join("/"));
        }
        if role.is_some() || !self.database_scope.is_empty() {
            let role = role.unwrap_or(DEFAULT_ROLE);
            if BUILTIN_ROLES.contains(&role) {
                secret.push(':');
                secret.push_str(role);
            } else {
                secret.push_str(":@role/");
                secret.push_str(role);
            }
        }
        secret
    }
}
