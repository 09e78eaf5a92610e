//! Custom error types with exit codes

use thiserror::Error;

/// Result alias used throughout the configuration core
pub type Result<T, E = ShellError> = core::result::Result<T, E>;

/// Main error type for fauna-shell configuration handling
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShellError {
    /// Malformed on-disk data: wrong value type, dangling default, reserved names
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The flags and config files do not resolve to a usable endpoint
    #[error("{message}")]
    Resolution { message: String },

    /// A database scope cannot be applied to the secret
    #[error("{message}")]
    Scope { message: String },

    /// A management command cannot be carried out
    #[error("{message}")]
    Command { message: String },

    /// Filesystem Error - reading or writing a config file failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },
}

impl ShellError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::InvalidConfig { .. } => 1,
            Self::Resolution { .. } => 2,
            Self::Scope { .. } => 3,
            Self::Command { .. } => 4,
            Self::Filesystem { .. } => 5,
        }
    }

    /// The message without the kind prefix
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidConfig { message }
            | Self::Resolution { message }
            | Self::Scope { message }
            | Self::Command { message }
            | Self::Filesystem { message } => message,
        }
    }

    /// Create an invalid configuration error
    #[inline]
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a resolution error
    #[inline]
    pub fn resolution<S: Into<String>>(message: S) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Create a scope error
    #[inline]
    pub fn scope<S: Into<String>>(message: S) -> Self {
        Self::Scope {
            message: message.into(),
        }
    }

    /// Create a command error
    #[inline]
    pub fn command<S: Into<String>>(message: S) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }
}
