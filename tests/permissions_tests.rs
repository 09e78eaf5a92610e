//! Root config permissions on a real filesystem

#![cfg(unix)]

use fauna_shell::config::ini::Section;
use fauna_shell::config::{RootConfig, ShellConfig, ShellOverrides};
use fauna_shell::system::{RealSystem, System as _};
use std::fs;
use std::os::unix::fs::PermissionsExt as _;
use tempfile::TempDir;

#[test]
fn test_save_writes_owner_only_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".fauna-shell");
    let system = RealSystem::new();

    RootConfig::parse("[endpoint.local]\nsecret = fn1234\n")
        .unwrap()
        .save(&system, &path)
        .unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    assert_eq!(system.file_mode(&path).unwrap(), Some(0o600));
}

#[test]
fn test_save_tightens_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".fauna-shell");
    fs::write(&path, "").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    RootConfig::default().save(&RealSystem::new(), &path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn test_write_with_mode_replaces_contents_of_loose_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".fauna-shell");
    fs::write(&path, "a much longer previous body\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o666)).unwrap();

    RealSystem::new()
        .write_with_mode(&path, b"secret = fn1\n", 0o600)
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "secret = fn1\n");
    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn test_write_with_mode_creates_owner_only_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fresh");

    RealSystem::new().write_with_mode(&path, b"x", 0o600).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn test_loose_permissions_are_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".fauna-shell");
    fs::write(&path, "[endpoint.local]\nsecret = fn1234\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

    let system = RealSystem::new();
    let config = ShellConfig::read_with_overrides(
        &system,
        ShellOverrides {
            flags: Section::new(),
            root_config_path: Some(path.clone()),
            project_config_path: Some(temp_dir.path().join("missing")),
            project_config: None,
        },
    );

    // An explicit project path must exist
    assert!(config.is_err());

    let config = ShellConfig::read_with_overrides(
        &system,
        ShellOverrides {
            root_config_path: Some(path),
            ..ShellOverrides::default()
        },
    )
    .unwrap();
    let warnings = config.config_errors(&system);
    assert!(warnings.iter().any(|warning| warning.contains("permissions 640")));
}
