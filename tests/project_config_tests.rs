//! Project config (`.fauna-project`) loading, editing and saving

use fauna_shell::config::{Environment, ProjectConfig, RootConfig};
use fauna_shell::system::{MockSystem, System as _};
use std::path::Path;

const PROJECT: &str = "\
schema_directory = schema
default = dev

[stack.dev]
endpoint = local
database = app

[stack.prod]
endpoint = cloud
database = app/prod
";

#[test]
fn test_parse_stacks() {
    let config = ProjectConfig::parse(PROJECT).unwrap();

    assert_eq!(config.default_environment.as_deref(), Some("dev"));
    assert_eq!(config.schema_directory.as_deref(), Some("schema"));
    assert_eq!(
        config.environments["prod"],
        Environment {
            endpoint: "cloud".to_owned(),
            database: "app/prod".to_owned(),
        }
    );
}

#[test]
fn test_parse_environment_sections() {
    let text = "default = dev\n[environment.dev]\nendpoint = local\ndatabase = app\n";
    let config = ProjectConfig::parse(text).unwrap();
    assert_eq!(config.environments["dev"].endpoint, "local");
}

#[test]
fn test_same_name_as_stack_and_environment_rejected() {
    let text = "\
[stack.dev]
endpoint = local
database = app

[environment.dev]
endpoint = local
database = other
";
    let err = ProjectConfig::parse(text).unwrap_err();
    assert!(err.to_string().contains("defined more than once"));
}

#[test]
fn test_dangling_default_rejected() {
    let err = ProjectConfig::parse("default = missing\n").unwrap_err();
    assert!(err.to_string().contains("Default environment 'missing' was not found"));
}

#[test]
fn test_malformed_environment_rejected() {
    let err = ProjectConfig::parse("[stack.dev]\nendpoint = local\n").unwrap_err();
    assert!(err.to_string().contains("database"));
}

#[test]
fn test_validate_rejects_dangling_endpoint() {
    let project = ProjectConfig::parse(PROJECT).unwrap();
    let root = RootConfig::parse("[endpoint.local]\nsecret = fn1234\n").unwrap();

    let err = project.validate(&root).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid configuration: Endpoint 'cloud' used by environment 'prod' not found in ~/.fauna-shell"
    );
}

#[test]
fn test_validate_accepts_known_endpoints() {
    let project = ProjectConfig::parse(PROJECT).unwrap();
    let root =
        RootConfig::parse("[endpoint.local]\nsecret = fn1\n[endpoint.cloud]\nsecret = fn2\n")
            .unwrap();

    project.validate(&root).unwrap();
}

#[test]
fn test_save_then_parse_round_trips() {
    let system = MockSystem::new().with_dir("/project");
    let path = Path::new("/project/.fauna-project");

    let config = ProjectConfig::parse(PROJECT).unwrap();
    config.save(&system, path).unwrap();

    let saved = system.read_to_string(path).unwrap();
    assert!(saved.contains("[stack.dev]"));
    assert!(saved.contains("schema_directory = schema"));
    assert_eq!(ProjectConfig::parse(&saved).unwrap(), config);
}

#[test]
fn test_environment_sections_saved_as_stacks() {
    let text = "[environment.dev]\nendpoint = local\ndatabase = app\n";
    let encoded = ProjectConfig::parse(text).unwrap().encode();

    assert_eq!(encoded, "[stack.dev]\ndatabase = app\nendpoint = local\n");
}

#[test]
fn test_add_and_select_environment() {
    let mut config = ProjectConfig::empty(None);
    let dev = Environment {
        endpoint: "local".to_owned(),
        database: "app".to_owned(),
    };

    config.add_environment("dev", dev.clone()).unwrap();
    config.select_default("dev").unwrap();

    assert_eq!(config.default_environment.as_deref(), Some("dev"));
    assert!(
        config
            .add_environment("dev", dev.clone())
            .unwrap_err()
            .to_string()
            .contains("already exists")
    );
    assert!(config.add_environment("default", dev).is_err());
    assert!(config.select_default("prod").is_err());
}
