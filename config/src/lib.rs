//! Configuration for CityPulse.
//!
//! - [`load_and_apply`]: read XDG `config.toml` and project `.env`, then apply to the process
//!   environment with priority **existing env > .env > XDG**.
//! - [`Settings`]: typed view of the variables the server and CLI consume.
//! - `tracing_init` (feature `tracing-init`): shared tracing subscriber for the binaries.

mod env_file;
mod settings;
#[cfg(feature = "tracing-init")]
pub mod tracing_init;
mod xdg_toml;

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub use settings::{
    Settings, DEFAULT_ADDR, DEFAULT_ATTEMPT_TIMEOUT_SECS, DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS,
};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(#[from] dotenv::Error),
}

/// Sets variables from `.env` and `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]` for keys the
/// process environment does not already define.
///
/// * `app_name`: e.g. `"citypulse"`, the XDG sub-directory.
/// * `override_dir`: look for `.env` here instead of the current directory.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = env_file::load_env_map(override_dir)?;

    let keys: HashSet<&String> = xdg_map.keys().chain(dotenv_map.keys()).collect();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(v) = dotenv_map.get(key).or_else(|| xdg_map.get(key)) {
            std::env::set_var(key, v);
        }
    }
    Ok(())
}

/// Serializes tests that mutate `XDG_CONFIG_HOME` or other process-wide variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn restore_var(key: &str, prev: Option<String>) {
        match prev {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
    }

    fn write_xdg(app: &str, body: &str) -> tempfile::TempDir {
        let xdg_dir = tempfile::tempdir().unwrap();
        let app_dir = xdg_dir.path().join(app);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), body).unwrap();
        xdg_dir
    }

    #[test]
    fn existing_env_wins() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(dotenv_dir.path().join(".env"), "PULSE_TEST_EXISTING=from_dotenv\n").unwrap();
        env::set_var("PULSE_TEST_EXISTING", "from_env");

        load_and_apply("citypulse-nonexistent-app", Some(dotenv_dir.path())).unwrap();
        assert_eq!(env::var("PULSE_TEST_EXISTING").as_deref(), Ok("from_env"));
        env::remove_var("PULSE_TEST_EXISTING");
    }

    #[test]
    fn no_config_anywhere_is_ok() {
        let empty = tempfile::tempdir().unwrap();
        assert!(load_and_apply("citypulse-nonexistent-app", Some(empty.path())).is_ok());
    }

    #[test]
    fn dotenv_overrides_xdg() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let xdg_dir = write_xdg("pulse-prio", "[env]\nPULSE_TEST_PRIORITY = \"from_xdg\"\n");
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(dotenv_dir.path().join(".env"), "PULSE_TEST_PRIORITY=from_dotenv\n").unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("PULSE_TEST_PRIORITY");

        let result = load_and_apply("pulse-prio", Some(dotenv_dir.path()));
        let val = env::var("PULSE_TEST_PRIORITY");
        env::remove_var("PULSE_TEST_PRIORITY");
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        result.unwrap();
        assert_eq!(val.as_deref(), Ok("from_dotenv"));
    }

    #[test]
    fn xdg_applied_when_no_dotenv() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let xdg_dir = write_xdg("pulse-xdg-only", "[env]\nPULSE_TEST_XDG_ONLY = \"from_xdg\"\n");
        let empty_dir = tempfile::tempdir().unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("PULSE_TEST_XDG_ONLY");

        let result = load_and_apply("pulse-xdg-only", Some(empty_dir.path()));
        let val = env::var("PULSE_TEST_XDG_ONLY");
        env::remove_var("PULSE_TEST_XDG_ONLY");
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        result.unwrap();
        assert_eq!(val.as_deref(), Ok("from_xdg"));
    }

    #[test]
    fn invalid_xdg_toml_fails_with_parse_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let xdg_dir = write_xdg("pulse-invalid", "invalid [[[\n");
        let empty_dir = tempfile::tempdir().unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        let result = load_and_apply("pulse-invalid", Some(empty_dir.path()));
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }
}
