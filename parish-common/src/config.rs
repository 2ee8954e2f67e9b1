//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "PARISH_ROOT";

/// Resolve the root folder following the priority order:
/// 1. Command-line argument (highest priority)
/// 2. `PARISH_ROOT` environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Locate the configuration file for the platform
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/parish/config.toml first, then /etc/parish/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("parish").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/parish/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let path = dirs::config_dir()
        .map(|d| d.join("parish").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("parish"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/parish"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("parish"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/parish"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("parish"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\parish"))
    } else {
        PathBuf::from("./parish_data")
    }
}

/// Resolved root folder with well-known paths inside it
#[derive(Debug, Clone)]
pub struct RootFolder {
    path: PathBuf,
}

impl RootFolder {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Resolve from CLI argument, environment, config file, or default
    pub fn resolve(cli_arg: Option<&Path>) -> Self {
        Self::new(resolve_root_folder(cli_arg))
    }

    /// Create the root folder and data directory if missing
    pub fn ensure_exists(&self) -> Result<()> {
        std::fs::create_dir_all(self.data_dir())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path to the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.path.join("parish.db")
    }

    /// Directory holding JSON data documents
    pub fn data_dir(&self) -> PathBuf {
        self.path.join("data")
    }

    /// Path to the sermon archive JSON document
    pub fn sermons_path(&self) -> PathBuf {
        self.data_dir().join("sermons.json")
    }

    /// Directory receiving timestamped backups
    pub fn backups_dir(&self) -> PathBuf {
        self.path.join("backups")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_takes_priority() {
        let root = resolve_root_folder(Some(Path::new("/tmp/parish-cli-root")));
        assert_eq!(root, PathBuf::from("/tmp/parish-cli-root"));
    }

    #[test]
    fn root_folder_paths() {
        let root = RootFolder::new(PathBuf::from("/srv/parish"));
        assert_eq!(root.database_path(), PathBuf::from("/srv/parish/parish.db"));
        assert_eq!(root.sermons_path(), PathBuf::from("/srv/parish/data/sermons.json"));
        assert_eq!(root.backups_dir(), PathBuf::from("/srv/parish/backups"));
    }
}
