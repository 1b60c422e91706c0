use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::model::config::Config;

/// Directory name used under the XDG config and data homes
const APP_DIR: &str = "habitgrid";

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join(APP_DIR).join("config.toml")
}

/// Default data directory, respecting XDG_DATA_HOME
pub fn default_data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"))
        .join(APP_DIR)
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config from a specific path.
/// A missing file yields defaults; a malformed one warns and yields defaults.
pub fn read_config_from(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not parse config; using defaults");
            Config::default()
        }
    }
}

/// Read the config from the default location.
pub fn read_config() -> Config {
    read_config_from(&config_path())
}

/// Resolve the data directory: explicit override, then config, then the default.
pub fn resolve_data_dir(override_dir: Option<&Path>, config: &Config) -> PathBuf {
    override_dir
        .map(Path::to_path_buf)
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(default_data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeRange;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_config_from(&dir.path().join("config.toml")), Config::default());
    }

    #[test]
    fn reads_fields_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_range = \"ALL\"\nseed = false\n").unwrap();
        let config = read_config_from(&path);
        assert_eq!(config.default_range, TimeRange::All);
        assert!(!config.seed);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_range = [[[").unwrap();
        assert_eq!(read_config_from(&path), Config::default());
    }

    #[test]
    fn data_dir_precedence() {
        let config = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };
        assert_eq!(
            resolve_data_dir(Some(Path::new("/from/flag")), &config),
            PathBuf::from("/from/flag")
        );
        assert_eq!(resolve_data_dir(None, &config), PathBuf::from("/from/config"));
    }
}
