//! Unit tests for name, path and URL validation

use fauna_shell::config::validation::{
    validate_database_path, validate_endpoint_name, validate_environment_name, validate_url,
};

#[test]
fn test_validate_url() {
    assert!(validate_url("https://db.fauna.com").is_ok());
    assert!(validate_url("http://localhost:8443").is_ok());
    assert!(validate_url("http://localhost:8443/").is_ok());
    assert!(validate_url("https://db.fauna.com/path?query=1").is_ok());
    assert!(validate_url("http://[::1]:8443").is_ok());
    assert!(validate_url("https://user:pw@db.fauna.com").is_ok());

    assert!(validate_url("localhost:8443").is_err());
    assert!(validate_url("db.fauna.com").is_err());
    assert!(validate_url("http://").is_err());
    assert!(validate_url("http://has space.com").is_err());
    assert!(validate_url("").is_err());
}

#[test]
fn test_validate_url_rejects_malformed_authority() {
    assert!(validate_url("http://[bad").is_err());
    assert!(validate_url("http://[::1").is_err());
    assert!(validate_url("http://host:99999").is_err());
    assert!(validate_url("http://host:80x").is_err());
    assert!(validate_url("http://:::").is_err());
    assert!(validate_url("http://:8443").is_err());
    assert!(validate_url("https://a b").is_err());

    assert!(validate_url("http://host:65535").is_ok());
}

#[test]
fn test_invalid_url_message() {
    let err = validate_url("not a url").unwrap_err();
    assert_eq!(err.to_string(), "Invalid database URL: not a url");
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_validate_names() {
    assert!(validate_endpoint_name("local").is_ok());
    assert!(validate_endpoint_name("default").is_err());
    assert!(validate_endpoint_name(" ").is_err());

    assert!(validate_environment_name("dev").is_ok());
    assert!(validate_environment_name("default").is_err());
    assert!(validate_environment_name("").is_err());
}

#[test]
fn test_validate_database_path() {
    assert!(validate_database_path("app").is_ok());
    assert!(validate_database_path("parent/child").is_ok());

    assert!(validate_database_path("").is_err());
    assert!(validate_database_path("//").is_err());
    assert!(validate_database_path("app:admin").is_err());
}
