//! Print the endpoint a command would connect to

use crate::cli::OutputFormat;
use crate::config::{EndpointConfig, LookupOptions, ShellConfig};
use anyhow::Result;

/// Resolve the endpoint and render it in the requested format
///
/// # Errors
///
/// Returns an error if:
/// - There is no usable endpoint or secret
/// - The selected environment does not exist
/// - The scope cannot be applied to the secret
#[inline]
pub fn resolve_endpoint(
    config: &ShellConfig,
    opts: LookupOptions<'_>,
    format: OutputFormat,
) -> Result<String> {
    let endpoint = config.lookup_endpoint(opts)?;

    match format {
        OutputFormat::Shell => Ok(format_as_shell(&endpoint)),
        OutputFormat::Json => format_as_json(&endpoint),
    }
}

/// `KEY=value` lines, one per field
fn format_as_shell(endpoint: &EndpointConfig) -> String {
    let port = endpoint.graphql_port.to_string();
    [
        ("FAUNA_SECRET", endpoint.secret.as_str()),
        ("FAUNA_URL", endpoint.url.as_str()),
        ("FAUNA_GRAPHQL_HOST", endpoint.graphql_host.as_str()),
        ("FAUNA_GRAPHQL_PORT", port.as_str()),
    ]
    .iter()
    .map(|(key, value)| format!("{key}={}", shell_escape(value)))
    .collect::<Vec<_>>()
    .join("\n")
}

fn format_as_json(endpoint: &EndpointConfig) -> Result<String> {
    serde_json::to_string_pretty(endpoint)
        .map_err(|e| anyhow::anyhow!("Failed to serialize to JSON: {e}"))
}

/// Escape a string for shell execution
///
/// Uses single quotes, so nothing inside is expanded. An embedded `'` is
/// written as `'\''`.
fn shell_escape(s: &str) -> String {
    if !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.' | ':' | '@')
        })
    {
        return s.to_owned();
    }

    format!("'{}'", s.replace('\'', r"'\''"))
}
