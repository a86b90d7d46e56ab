//! Environment and file layering of the configuration.
//!
//! Every test touching `SPHCASE_*` variables runs serially.

#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use serial_test::serial;
use sphcase_core::config::PROJECT_CONFIG_FILE;
use sphcase_core::{Config, Error, Result};

const ENV_KEYS: [&str; 5] = [
    "SPHCASE_APP_NAME",
    "SPHCASE_SNAPSHOT_FILE",
    "SPHCASE_EXPORT_SUFFIX",
    "SPHCASE_WRITE_COMMENTS",
    "SPHCASE_CASE_LIMITS_OBJECT",
];

/// Clears every override on creation and on drop.
struct EnvGuard;

impl EnvGuard {
    fn new() -> Self {
        clear_env();
        Self
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        clear_env();
    }
}

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_no_layers_gives_defaults() -> Result<()> {
    let _guard = EnvGuard::new();
    assert_eq!(Config::load_from(None, None)?, Config::default());
    Ok(())
}

#[test]
#[serial]
fn test_env_overrides_defaults() -> Result<()> {
    let _guard = EnvGuard::new();
    std::env::set_var("SPHCASE_APP_NAME", "Flume Designer");
    std::env::set_var("SPHCASE_WRITE_COMMENTS", "false");
    std::env::set_var("SPHCASE_CASE_LIMITS_OBJECT", "domain");

    let config = Config::load_from(None, None)?;
    assert_eq!(config.export.app_name, "Flume Designer");
    assert!(!config.export.write_comments.as_bool());
    assert_eq!(config.export.case_limits_object, "domain");
    Ok(())
}

#[test]
#[serial]
fn test_invalid_write_comments_is_rejected() {
    let _guard = EnvGuard::new();
    std::env::set_var("SPHCASE_WRITE_COMMENTS", "sometimes");

    let result = Config::load_from(None, None);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
#[serial]
fn test_env_values_are_validated() {
    let _guard = EnvGuard::new();
    std::env::set_var("SPHCASE_EXPORT_SUFFIX", "_Def.json");

    let result = Config::load_from(None, None);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
#[serial]
fn test_env_wins_over_project_file() -> Result<()> {
    let _guard = EnvGuard::new();
    let dir = tempfile::tempdir()?;
    let project = dir.path().join(PROJECT_CONFIG_FILE);
    std::fs::write(
        &project,
        "[output]\nsnapshot_file = \"flume.sphc\"\n\n[export]\napp_name = \"From file\"\n",
    )?;
    std::env::set_var("SPHCASE_APP_NAME", "From env");

    let config = Config::load_from(None, Some(&project))?;
    assert_eq!(config.output.snapshot_file, "flume.sphc");
    assert_eq!(config.export.app_name, "From env");
    Ok(())
}

#[test]
#[serial]
fn test_project_file_overrides_global_file() -> Result<()> {
    let _guard = EnvGuard::new();
    let dir = tempfile::tempdir()?;
    let global = dir.path().join("global.toml");
    let project = dir.path().join(PROJECT_CONFIG_FILE);
    std::fs::write(
        &global,
        "[output]\nmesh_dir = \"stl\"\n\n[export]\napp_name = \"Global\"\n",
    )?;
    std::fs::write(&project, "[export]\napp_name = \"Project\"\n")?;

    let config = Config::load_from(Some(&global), Some(&project))?;
    assert_eq!(config.output.mesh_dir, "stl");
    assert_eq!(config.export.app_name, "Project");
    Ok(())
}
