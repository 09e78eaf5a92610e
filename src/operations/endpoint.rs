//! `fauna endpoint` commands: manage endpoints in `~/.fauna-shell`

use crate::config::validation::validate_url;
use crate::config::{Endpoint, Secret, ShellConfig};
use crate::error::ShellError;
use crate::system::System;
use anyhow::{Context as _, Result};
use tracing::debug;

/// Add an endpoint, replacing any endpoint with the same name
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty or `default`
/// - The URL or secret is invalid
/// - The root config cannot be saved
#[inline]
pub fn add_endpoint(
    system: &dyn System,
    config: &mut ShellConfig,
    name: &str,
    url: Option<&str>,
    secret: &str,
    set_default: bool,
) -> Result<String> {
    if let Some(url) = url {
        validate_url(url)?;
    }
    let secret = Secret::parse(secret).context("Invalid endpoint secret")?;
    let endpoint = Endpoint::new(secret).with_url(url.map(str::to_owned));

    if config.root_config.endpoints.contains_key(name) {
        debug!("Replacing endpoint {name}");
    }
    config.root_config.insert_endpoint(name, endpoint)?;
    if set_default {
        config.root_config.select_default(name)?;
    }
    config.save_root_config(system)?;

    Ok(format!(
        "Saved endpoint {name} to {}",
        root_path_display(config)
    ))
}

/// List endpoints, marking the default with `*`
#[must_use]
#[inline]
pub fn list_endpoints(config: &ShellConfig) -> String {
    let root = &config.root_config;
    let mut lines = vec!["Available endpoints:".to_owned()];
    lines.extend(root.endpoints.keys().map(|name| {
        let marker = if root.default_endpoint.as_deref() == Some(name.as_str()) {
            "* "
        } else {
            "  "
        };
        format!("{marker}{name}")
    }));
    lines.join("\n")
}

/// Remove an endpoint
///
/// # Errors
///
/// Returns an error if there is no such endpoint or the root config cannot be saved.
#[inline]
pub fn remove_endpoint(
    system: &dyn System,
    config: &mut ShellConfig,
    name: &str,
) -> Result<String> {
    config.root_config.remove_endpoint(name)?;
    config.save_root_config(system)?;
    Ok(format!("Removed endpoint {name}."))
}

/// Make an endpoint the default
///
/// # Errors
///
/// Returns an error if there are no endpoints, the name is unknown, or the
/// root config cannot be saved.
#[inline]
pub fn select_endpoint(
    system: &dyn System,
    config: &mut ShellConfig,
    name: &str,
) -> Result<String> {
    if config.root_config.is_empty() {
        return Err(ShellError::command(
            "No endpoints defined. Create one with `fauna endpoint add`",
        )
        .into());
    }
    config.root_config.select_default(name)?;
    config.save_root_config(system)?;
    Ok(format!("Updated default endpoint to {name}."))
}

fn root_path_display(config: &ShellConfig) -> String {
    config
        .root_config_path()
        .map_or_else(|| "~/.fauna-shell".to_owned(), |path| path.display().to_string())
}
