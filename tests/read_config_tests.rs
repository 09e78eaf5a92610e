//! Loading config files and `FAUNA_*` variables through the System abstraction

use fauna_shell::config::flags::flag_section;
use fauna_shell::config::ini::Section;
use fauna_shell::config::{LookupOptions, ShellConfig, find_project_config_path};
use fauna_shell::system::MockSystem;
use std::path::Path;

const ROOT: &[u8] = b"\
default = local

[endpoint.local]
secret = fn1234
url = http://localhost:8443

[endpoint.cloud]
secret = fn5678
";

const PROJECT: &[u8] = b"\
default = dev

[stack.dev]
endpoint = cloud
database = app
";

fn system() -> MockSystem {
    MockSystem::new()
        .with_home("/home/user")
        .with_file("/home/user/.fauna-shell", ROOT)
        .with_file_mode("/home/user/.fauna-shell", 0o600)
        .with_current_dir("/work/project/src")
}

#[test]
fn test_reads_root_config_from_home() {
    let config = ShellConfig::read(&system(), Section::new()).unwrap();

    assert_eq!(
        config.root_config_path(),
        Some(Path::new("/home/user/.fauna-shell"))
    );
    assert_eq!(config.endpoint_name(), Some("local"));
    assert!(config.project_config.is_none());
    assert!(config.config_errors(&system()).is_empty());
}

#[test]
fn test_finds_project_config_in_ancestor() {
    let system = system().with_file("/work/project/.fauna-project", PROJECT);

    assert_eq!(
        find_project_config_path(&system).as_deref(),
        Some(Path::new("/work/project/.fauna-project"))
    );

    let config = ShellConfig::read(&system, Section::new()).unwrap();
    assert_eq!(config.environment_name(), Some("dev"));
    let endpoint = config.lookup_endpoint(LookupOptions::default()).unwrap();
    assert_eq!(endpoint.secret, "fn5678:app:admin");
}

#[test]
fn test_nearest_project_config_wins() {
    let system = system()
        .with_file("/work/.fauna-project", b"[stack.outer]\nendpoint = local\ndatabase = outer\n")
        .with_file("/work/project/.fauna-project", PROJECT);

    let config = ShellConfig::read(&system, Section::new()).unwrap();
    assert_eq!(
        config.project_config_path(),
        Some(Path::new("/work/project/.fauna-project"))
    );
}

#[test]
fn test_no_project_without_current_dir() {
    let system = system()
        .with_file("/work/project/.fauna-project", PROJECT)
        .without_current_dir();

    assert!(find_project_config_path(&system).is_none());
}

#[test]
fn test_missing_root_config_is_empty() {
    let system = MockSystem::new().with_home("/home/user");

    let config = ShellConfig::read(&system, Section::new()).unwrap();

    assert!(config.root_config.is_empty());
    let warnings = config.config_errors(&system);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("does not exist"));
}

#[test]
fn test_permissions_warning() {
    let system = system().with_file_mode("/home/user/.fauna-shell", 0o644);

    let config = ShellConfig::read(&system, Section::new()).unwrap();
    let warnings = config.config_errors(&system);

    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("permissions 644"));
    assert!(warnings[0].contains("chmod 600"));
}

#[test]
fn test_config_errors_list_invalid_endpoints_and_missing_environment() {
    let system = MockSystem::new()
        .with_home("/home/user")
        .with_file(
            "/home/user/.fauna-shell",
            b"[endpoint.broken]\nurl = http://localhost\n[endpoint.ok]\nsecret = fn1\n",
        )
        .with_file_mode("/home/user/.fauna-shell", 0o600)
        .with_current_dir("/work")
        .with_file("/work/.fauna-project", b"[stack.dev]\nendpoint = ok\ndatabase = app\n");

    let config = ShellConfig::read(&system, flag_section([("environment", "prod")])).unwrap();
    let warnings = config.config_errors(&system);

    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("'broken'"));
    assert_eq!(warnings[1], "No such environment 'prod' in .fauna-project");
}

#[test]
fn test_parse_error_names_file() {
    let system = system().with_file("/work/project/.fauna-project", b"[stack.dev\n");

    let err = ShellConfig::read(&system, Section::new()).unwrap_err();
    assert!(err.to_string().contains("/work/project/.fauna-project"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_env_vars_fill_missing_flags() {
    let system = system()
        .with_env("FAUNA_ENDPOINT", "cloud")
        .with_env("FAUNA_URL", "http://localhost:9000");

    let config = ShellConfig::read(&system, Section::new()).unwrap();
    let endpoint = config.lookup_endpoint(LookupOptions::default()).unwrap();

    assert_eq!(endpoint.secret, "fn5678:admin");
    assert_eq!(endpoint.url, "http://localhost:9000");
    assert_eq!(config.flags().str_opt("endpoint").unwrap(), Some("cloud"));
}

#[test]
fn test_flags_beat_env_vars() {
    let system = system()
        .with_env("FAUNA_ENDPOINT", "cloud")
        .with_env("FAUNA_URL", "http://localhost:9000");

    let flags = flag_section([("endpoint", "local"), ("domain", "example.com")]);
    let config = ShellConfig::read(&system, flags).unwrap();
    let endpoint = config.lookup_endpoint(LookupOptions::default()).unwrap();

    assert_eq!(endpoint.secret, "fn1234:admin");
    assert_eq!(endpoint.url, "https://example.com");
    assert_eq!(config.flags().str_opt("endpoint").unwrap(), Some("local"));
    assert_eq!(config.flags().str_opt("url").unwrap(), None);
}

#[test]
fn test_env_secret_and_environment_are_exclusive() {
    let system = system()
        .with_file("/work/project/.fauna-project", PROJECT)
        .with_env("FAUNA_SECRET", "fn999")
        .with_env("FAUNA_ENVIRONMENT", "dev");

    assert!(ShellConfig::read(&system, Section::new()).is_err());
}

#[test]
fn test_stack_flag_suppresses_environment_var() {
    let system = system()
        .with_file(
            "/work/project/.fauna-project",
            b"[stack.dev]\nendpoint = cloud\ndatabase = app\n[stack.qa]\nendpoint = local\ndatabase = qa\n",
        )
        .with_env("FAUNA_ENVIRONMENT", "dev");

    let config = ShellConfig::read(&system, flag_section([("stack", "qa")])).unwrap();
    assert_eq!(config.environment_name(), Some("qa"));
}

#[test]
fn test_empty_env_var_is_ignored() {
    let system = system().with_env("FAUNA_SECRET", "");

    let config = ShellConfig::read(&system, Section::new()).unwrap();
    assert!(config.secret_flag().is_none());
}
