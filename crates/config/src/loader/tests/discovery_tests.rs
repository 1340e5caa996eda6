//! Root and path resolution precedence for `ConfigContext`.

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use crate::constants::{ENV_CONFIG_PATH, ENV_PROJECT_ROOT};
use crate::loader::ConfigContext;

fn without_overrides<F: FnOnce()>(f: F) {
    temp_env::with_vars(
        [
            (ENV_PROJECT_ROOT, None::<&str>),
            (ENV_CONFIG_PATH, None::<&str>),
        ],
        f,
    );
}

#[test]
#[serial]
fn test_start_dir_walks_up_to_marker() {
    without_overrides(|| {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        let nested = root.join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join("config.yml"), "App:\n  name: demo\n").unwrap();

        let ctx = ConfigContext::new().with_start_dir(&nested);
        assert_eq!(ctx.project_root(), root);
        assert_eq!(ctx.get_string("App", "name", ""), "demo");
    });
}

#[test]
#[serial]
fn test_env_project_root_used_without_builder_override() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.ini"), "[A]\nk = env\n").unwrap();
    let root = temp_dir.path().to_string_lossy().into_owned();

    temp_env::with_vars(
        [
            (ENV_PROJECT_ROOT, Some(root.as_str())),
            (ENV_CONFIG_PATH, None),
        ],
        || {
            let ctx = ConfigContext::new();
            assert_eq!(ctx.project_root(), temp_dir.path());
            assert_eq!(ctx.get_string("A", "k", ""), "env");
        },
    );
}

#[test]
#[serial]
fn test_builder_root_beats_env_root() {
    let env_dir = TempDir::new().unwrap();
    let builder_dir = TempDir::new().unwrap();
    let env_root = env_dir.path().to_string_lossy().into_owned();

    temp_env::with_vars(
        [
            (ENV_PROJECT_ROOT, Some(env_root.as_str())),
            (ENV_CONFIG_PATH, None),
        ],
        || {
            let ctx = ConfigContext::new().with_project_root(builder_dir.path());
            assert_eq!(ctx.project_root(), builder_dir.path());
        },
    );
}

#[test]
#[serial]
fn test_env_config_path_used() {
    let temp_dir = TempDir::new().unwrap();
    let custom = temp_dir.path().join("settings.yaml");
    fs::write(&custom, "A:\n  k: custom\n").unwrap();
    let custom_str = custom.to_string_lossy().into_owned();

    temp_env::with_vars(
        [
            (ENV_PROJECT_ROOT, None),
            (ENV_CONFIG_PATH, Some(custom_str.as_str())),
        ],
        || {
            let ctx = ConfigContext::new().with_project_root(temp_dir.path());
            assert_eq!(ctx.config_paths().primary, Some(custom.clone()));
            assert_eq!(ctx.get_string("A", "k", ""), "custom");
        },
    );
}

#[test]
#[serial]
fn test_paths_report_local_only_when_present() {
    without_overrides(|| {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.ini"), "[A]\n").unwrap();

        let ctx = ConfigContext::new().with_project_root(temp_dir.path());
        let paths = ctx.config_paths();
        assert_eq!(paths.primary, Some(temp_dir.path().join("config.ini")));
        assert_eq!(paths.local, None);

        fs::write(temp_dir.path().join("config.local.ini"), "[A]\n").unwrap();
        ctx.reset();
        assert_eq!(
            ctx.config_paths().local,
            Some(temp_dir.path().join("config.local.ini"))
        );
    });
}
