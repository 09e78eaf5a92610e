use crate::config::flags;
use crate::config::ini::{Section, Value};
use clap::{Parser, Subcommand};
use core::str::FromStr;

/// Command-line arguments for fauna
#[derive(Parser, Debug, Clone)]
#[command(name = "fauna")]
#[command(about = "Manage Fauna endpoints and environments, and resolve connection settings")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the endpoint a command would connect to
    Resolve(ResolveArgs),

    /// Manage endpoints in ~/.fauna-shell
    Endpoint {
        #[command(subcommand)]
        command: EndpointCommand,
    },

    /// Manage environments in .fauna-project
    #[command(alias = "stack")]
    Environment {
        #[command(subcommand)]
        command: EnvironmentCommand,
    },

    /// Manage the project config
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
}

/// Flags that select and override the endpoint to connect to
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Endpoint from ~/.fauna-shell to use
    #[arg(long, value_name = "NAME")]
    pub endpoint: Option<String>,

    /// Secret to connect with, instead of an endpoint's secret
    #[arg(long, value_name = "SECRET")]
    pub secret: Option<String>,

    /// Environment from .fauna-project to use
    #[arg(long, alias = "stack", value_name = "NAME")]
    pub environment: Option<String>,

    /// Database URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// URL scheme, when not giving --url
    #[arg(long, value_name = "SCHEME")]
    pub scheme: Option<String>,

    /// Database host, when not giving --url
    #[arg(long, value_name = "HOST")]
    pub domain: Option<String>,

    /// Database port, when not giving --url
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// GraphQL host
    #[arg(long = "graphqlHost", value_name = "HOST")]
    pub graphql_host: Option<String>,

    /// GraphQL port
    #[arg(long = "graphqlPort", value_name = "PORT")]
    pub graphql_port: Option<u16>,
}

impl ConnectionArgs {
    /// The flags as a config section, holding only flags that were given
    #[must_use]
    pub fn to_flags(&self) -> Section {
        let strings = [
            (flags::ENDPOINT, self.endpoint.as_deref()),
            (flags::SECRET, self.secret.as_deref()),
            (flags::ENVIRONMENT, self.environment.as_deref()),
            (flags::URL, self.url.as_deref()),
            (flags::SCHEME, self.scheme.as_deref()),
            (flags::DOMAIN, self.domain.as_deref()),
            (flags::GRAPHQL_HOST, self.graphql_host.as_deref()),
        ];
        let numbers = [
            (flags::PORT, self.port),
            (flags::GRAPHQL_PORT, self.graphql_port),
        ];

        strings
            .into_iter()
            .filter_map(|(key, value)| Some((key.to_owned(), Value::from(value?))))
            .chain(numbers.into_iter().filter_map(|(key, value)| {
                Some((key.to_owned(), Value::Number(i64::from(value?))))
            }))
            .collect()
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Database path below the selected environment's database
    #[arg(long, value_name = "PATH")]
    pub scope: Option<String>,

    /// Role to connect with (admin, server, server-readonly, client, or a custom role)
    #[arg(long, value_name = "ROLE")]
    pub role: Option<String>,

    /// Output format: shell or json
    #[arg(
        long = "output-format",
        value_name = "FORMAT",
        env = "FAUNA_OUTPUT_FORMAT",
        default_value = "shell"
    )]
    pub output_format: OutputFormat,
}

#[derive(Subcommand, Debug, Clone)]
pub enum EndpointCommand {
    /// Add or replace an endpoint
    Add {
        /// Endpoint name
        name: String,

        /// Database URL
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Account secret for this endpoint
        #[arg(long, value_name = "SECRET")]
        secret: String,

        /// Make this the default endpoint
        #[arg(long)]
        set_default: bool,
    },

    /// List endpoints, marking the default
    List,

    /// Remove an endpoint
    Remove {
        /// Endpoint name
        name: String,
    },

    /// Make an endpoint the default
    Select {
        /// Endpoint name
        name: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum EnvironmentCommand {
    /// Add an environment to .fauna-project
    Add(EnvironmentArgs),

    /// List environments, marking the default
    List,

    /// Make an environment the default
    Select {
        /// Environment name
        name: String,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct EnvironmentArgs {
    /// Environment name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Endpoint from ~/.fauna-shell the environment connects through
    #[arg(long, value_name = "ENDPOINT")]
    pub endpoint: String,

    /// Database path below the endpoint
    #[arg(long, value_name = "PATH")]
    pub database: String,

    /// Make this the default environment
    #[arg(long)]
    pub set_default: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProjectCommand {
    /// Create a .fauna-project file
    Init {
        /// Directory to create the project file in
        #[arg(value_name = "DIR", default_value = ".")]
        dir: String,

        /// Directory holding the project's schema files
        #[arg(long, value_name = "DIR")]
        schema_directory: Option<String>,

        /// Name of a first environment to add
        #[arg(long, value_name = "NAME", requires = "endpoint", requires = "database")]
        name: Option<String>,

        /// Endpoint for the first environment
        #[arg(long, value_name = "ENDPOINT", requires = "name")]
        endpoint: Option<String>,

        /// Database for the first environment
        #[arg(long, value_name = "PATH", requires = "name")]
        database: Option<String>,
    },
}

/// How `resolve` prints the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutputFormat {
    /// `KEY=value` lines that can be `eval`ed by a shell
    Shell,
    /// A JSON object
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shell" => Ok(Self::Shell),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {s}. Use 'shell' or 'json'")),
        }
    }
}
