//! Connection flags and their environment-variable fallbacks

use crate::config::ini::{Section, Value};
use crate::config::section::TypedSection;
use crate::error::Result;
use crate::system::System;
use tracing::debug;

pub const ENDPOINT: &str = "endpoint";
pub const SECRET: &str = "secret";
pub const ENVIRONMENT: &str = "environment";
pub const STACK: &str = "stack";
pub const URL: &str = "url";
pub const SCHEME: &str = "scheme";
pub const DOMAIN: &str = "domain";
pub const PORT: &str = "port";
pub const GRAPHQL_HOST: &str = "graphqlHost";
pub const GRAPHQL_PORT: &str = "graphqlPort";

/// Flags that may be supplied through the environment instead
pub const ENV_FLAGS: [(&str, &str); 6] = [
    (ENDPOINT, "FAUNA_ENDPOINT"),
    (SECRET, "FAUNA_SECRET"),
    (ENVIRONMENT, "FAUNA_ENVIRONMENT"),
    (URL, "FAUNA_URL"),
    (GRAPHQL_HOST, "FAUNA_GRAPHQL_HOST"),
    (GRAPHQL_PORT, "FAUNA_GRAPHQL_PORT"),
];

/// Build a flag set from `(name, value)` pairs
pub fn flag_section<'a, I>(pairs: I) -> Section
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), Value::from(value)))
        .collect()
}

/// Fill flags not given on the command line from `FAUNA_*` variables
///
/// A flag that is already set always wins over the environment. `FAUNA_URL`
/// is ignored when any of `--url`, `--scheme`, `--domain` or `--port` is set.
pub fn apply_env_defaults(flags: &mut Section, system: &dyn System) {
    for (key, var) in ENV_FLAGS {
        let already_set = match key {
            ENVIRONMENT => flags.contains_key(ENVIRONMENT) || flags.contains_key(STACK),
            URL => [URL, SCHEME, DOMAIN, PORT]
                .iter()
                .any(|part| flags.contains_key(*part)),
            _ => flags.contains_key(key),
        };
        if already_set {
            continue;
        }
        if let Ok(value) = system.env_var(var)
            && !value.is_empty()
        {
            debug!("Using {var} for --{key}");
            flags.insert(key.to_owned(), Value::String(value));
        }
    }
}

/// The selected environment, given as `--environment` or its alias `--stack`
///
/// # Errors
///
/// Returns an error if the flag is not a string.
pub fn environment_flag<'a>(flags: TypedSection<'a>) -> Result<Option<&'a str>> {
    Ok(match flags.str_opt(ENVIRONMENT)? {
        Some(name) => Some(name),
        None => flags.str_opt(STACK)?,
    })
}
