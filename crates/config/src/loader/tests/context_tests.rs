//! Loading, merging and caching through `ConfigContext`.

use std::fs;

use serde_yaml::Value;
use serial_test::serial;
use tempfile::TempDir;

use crate::loader::ConfigContext;
use crate::test_util::capture_events;
use crate::types::ConfigFormat;

const PRIMARY_INI: &str = "\
[Database]
host = localhost
port = 5432
enable_ssl = true

[User]
name = Admin
roles =
    admin
    editor
    viewer
";

fn context_for(dir: &TempDir) -> ConfigContext {
    ConfigContext::new().with_project_root(dir.path())
}

#[test]
#[serial]
fn test_ini_primary_loaded() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.ini"), PRIMARY_INI).unwrap();

    let ctx = context_for(&temp_dir);
    let config = ctx.get_config();

    assert_eq!(config.format(), Some(ConfigFormat::Ini));
    assert_eq!(ctx.get_string("Database", "host", ""), "localhost");
    assert_eq!(ctx.get_int("Database", "port", 0), 5432);
    assert!(ctx.get_boolean("Database", "enable_ssl", false));
    assert_eq!(
        ctx.get_list("User", "roles", Vec::new()),
        vec!["admin", "editor", "viewer"]
    );
}

#[test]
#[serial]
fn test_ini_list_with_blank_line_loads_whole_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.ini"),
        "[Database]\nhost = localhost\n\n[User]\nroles =\n    admin\n\n    editor\n    viewer\n",
    )
    .unwrap();

    let ctx = context_for(&temp_dir);

    assert_eq!(ctx.get_string("Database", "host", "fallback"), "localhost");
    assert_eq!(
        ctx.get_list("User", "roles", Vec::new()),
        vec!["admin", "editor", "viewer"]
    );
}

#[test]
#[serial]
fn test_local_override_deep_merged() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.yml"),
        "Database:\n  host: localhost\n  port: 5432\n  enable_ssl: true\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("config.local.yml"),
        "Database:\n  port: 6000\n  user: local_user\n",
    )
    .unwrap();

    let ctx = context_for(&temp_dir);
    assert_eq!(ctx.get_value("Database", "host", ""), Value::from("localhost"));
    assert_eq!(ctx.get_int("Database", "port", 0), 6000);
    assert!(ctx.get_boolean("Database", "enable_ssl", false));
    assert_eq!(ctx.get_string("Database", "user", ""), "local_user");
}

#[test]
#[serial]
fn test_ini_local_override_merged() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.ini"), PRIMARY_INI).unwrap();
    fs::write(
        temp_dir.path().join("config.local.ini"),
        "[Database]\nport = 7000\n",
    )
    .unwrap();

    let ctx = context_for(&temp_dir);
    assert_eq!(ctx.get_int("Database", "port", 0), 7000);
    assert_eq!(ctx.get_string("Database", "host", ""), "localhost");
}

#[test]
#[serial]
fn test_yaml_preferred_over_ini() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.ini"), "[A]\nsource = ini\n").unwrap();
    fs::write(temp_dir.path().join("config.yml"), "A:\n  source: yaml\n").unwrap();

    let ctx = context_for(&temp_dir);
    assert_eq!(ctx.get_string("A", "source", ""), "yaml");
}

#[test]
#[serial]
fn test_no_config_file_yields_empty_config() {
    let temp_dir = TempDir::new().unwrap();

    let ctx = context_for(&temp_dir);
    let config = ctx.get_config();
    assert!(config.is_empty());
    assert_eq!(config.format(), None);
    assert_eq!(ctx.get_int("A", "b", 3), 3);
}

#[test]
#[serial]
fn test_malformed_primary_yields_empty_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.yml"), "A: [unclosed\n").unwrap();

    let ctx = context_for(&temp_dir);
    let events = capture_events(|| {
        assert!(ctx.get_config().is_empty());
    });
    assert!(
        events
            .iter()
            .any(|e| e.level == tracing::Level::ERROR && e.message.contains("Failed to load")),
        "expected an error log; got: {events:?}"
    );
}

#[test]
#[serial]
fn test_malformed_local_ignored_primary_kept() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.ini"), PRIMARY_INI).unwrap();
    fs::write(
        temp_dir.path().join("config.local.ini"),
        "orphan = value\n",
    )
    .unwrap();

    let ctx = context_for(&temp_dir);
    let events = capture_events(|| {
        assert_eq!(ctx.get_int("Database", "port", 0), 5432);
    });
    assert!(
        events
            .iter()
            .any(|e| e.level == tracing::Level::ERROR && e.message.contains("local config override")),
        "expected an error log; got: {events:?}"
    );
}

#[test]
#[serial]
fn test_config_is_cached_until_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yml");
    fs::write(&path, "A:\n  k: 1\n").unwrap();

    let ctx = context_for(&temp_dir);
    let first = ctx.get_config();
    fs::write(&path, "A:\n  k: 2\n").unwrap();

    let second = ctx.get_config();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(ctx.get_int("A", "k", 0), 1);

    ctx.load_config();
    assert_eq!(ctx.get_int("A", "k", 0), 2);
    assert_eq!(first.get_int("A", "k", 0), 1, "old snapshot stays intact");
}

#[test]
#[serial]
fn test_reset_rediscovers_files() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_for(&temp_dir);
    assert!(ctx.get_config().is_empty());
    assert!(ctx.config_paths().primary.is_none());

    fs::write(temp_dir.path().join("config.yml"), "A:\n  k: 5\n").unwrap();
    assert!(ctx.get_config().is_empty());

    ctx.reset();
    assert_eq!(ctx.get_int("A", "k", 0), 5);
}

#[test]
#[serial]
fn test_save_value_does_not_touch_cache() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.ini");
    fs::write(&path, PRIMARY_INI).unwrap();

    let ctx = context_for(&temp_dir);
    assert_eq!(ctx.get_string("Database", "host", ""), "localhost");

    assert!(ctx.save_value("Database", "host", "db.internal"));
    assert_eq!(ctx.get_string("Database", "host", ""), "localhost");

    ctx.load_config();
    assert_eq!(ctx.get_string("Database", "host", ""), "db.internal");
}

#[test]
#[serial]
fn test_save_value_without_primary_returns_false() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_for(&temp_dir);

    assert!(!ctx.save_value("A", "k", 1));
    assert!(!temp_dir.path().join("config.ini").exists());
}

#[test]
#[serial]
fn test_explicit_config_path_wins() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.yml"), "A:\n  source: discovered\n").unwrap();
    let custom = temp_dir.path().join("custom.yaml");
    fs::write(&custom, "A:\n  source: explicit\n").unwrap();
    fs::write(
        temp_dir.path().join("custom.local.yaml"),
        "A:\n  extra: local\n",
    )
    .unwrap();

    let ctx = context_for(&temp_dir).with_config_path(&custom);
    assert_eq!(ctx.config_paths().primary.as_deref(), Some(custom.as_path()));
    assert_eq!(ctx.get_string("A", "source", ""), "explicit");
    assert_eq!(ctx.get_string("A", "extra", ""), "local");
}

#[test]
#[serial]
fn test_get_section_and_multiple_through_context() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.ini"), PRIMARY_INI).unwrap();

    let ctx = context_for(&temp_dir);
    let db = ctx.get_section("Database");
    assert_eq!(db.len(), 3);

    let values = ctx.get_multiple("User", &["name", "missing"]);
    assert_eq!(values["name"], Some(Value::from("Admin")));
    assert_eq!(values["missing"], None);
}
