//! Validation of user-supplied names and URLs

use crate::error::{Result, ShellError};
use regex::Regex;

/// Name of the key that points at the default endpoint or environment
pub const RESERVED_NAME: &str = "default";

/// Validate a database URL
///
/// # Errors
///
/// Returns an error if:
/// - The URL has no scheme
/// - The URL has no host, or an IPv6 host without its closing bracket
/// - The port is not a number from 0 to 65535
/// - The URL contains whitespace
#[inline]
pub fn validate_url(url: &str) -> Result<()> {
    let pattern = Regex::new(
        r"^[A-Za-z][A-Za-z0-9+.\-]*://(?:[^\s/?#@]*@)?(?:\[[0-9A-Fa-f:.]+\]|[^\s/?#@\[\]:<>\\^|]+)(?::(?P<port>[0-9]*))?(?:[/?#]\S*)?$",
    )
    .map_err(|e| ShellError::resolution(format!("Invalid URL pattern: {e}")))?;
    let invalid = || ShellError::resolution(format!("Invalid database URL: {url}"));

    let captures = pattern.captures(url).ok_or_else(invalid)?;
    if let Some(port) = captures.name("port")
        && !port.as_str().is_empty()
        && port.as_str().parse::<u16>().is_err()
    {
        return Err(invalid());
    }
    Ok(())
}

/// Validate the name of a new endpoint
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - The name is the reserved word `default`
#[inline]
pub fn validate_endpoint_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ShellError::command("Endpoint name cannot be empty"));
    }
    if name == RESERVED_NAME {
        return Err(ShellError::command("Endpoint cannot be named 'default'"));
    }
    Ok(())
}

/// Validate the name of a new environment
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - The name is the reserved word `default`
#[inline]
pub fn validate_environment_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ShellError::command("Environment name cannot be empty"));
    }
    if name == RESERVED_NAME {
        return Err(ShellError::command("Environment cannot be named 'default'"));
    }
    Ok(())
}

/// Validate a slash-delimited database path
///
/// # Errors
///
/// Returns an error if:
/// - The path is empty
/// - The path contains `:`, which would be read as a secret annotation
#[inline]
pub fn validate_database_path(path: &str) -> Result<()> {
    if path.split('/').all(str::is_empty) {
        return Err(ShellError::command("Database path cannot be empty"));
    }
    if path.contains(':') {
        return Err(ShellError::command(format!(
            "Database path cannot contain ':': '{path}'"
        )));
    }
    Ok(())
}
