//! User configuration and preferences

use crate::error::{PicCullError, Result};
use crate::tui::input::KeyBindings;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserConfig {
    /// Whether the welcome dialog has been shown
    pub welcome_shown: bool,
    /// Delete culled images instead of moving them to `pic-culled/`
    pub delete_on_cull: bool,
    pub keybindings: KeyBindings,
}

fn config_error(context: &str, e: impl std::fmt::Display) -> PicCullError {
    PicCullError::ConfigError(format!("{}: {}", context, e))
}

impl UserConfig {
    /// Get the config file path (~/.config/piccull/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("piccull").join("config.json"))
    }

    /// Loads the config at `path`, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(path).map_err(|e| config_error("Failed to read config file", e))?;

        serde_json::from_str(&contents).map_err(|e| config_error("Failed to parse config file", e))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| config_error("Failed to create config directory", e))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| config_error("Failed to serialize config", e))?;

        fs::write(path, contents).map_err(|e| config_error("Failed to write config file", e))?;

        info!("saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::KeyTrigger;
    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert!(!config.welcome_shown);
        assert!(!config.delete_on_cull);
        assert_eq!(config.keybindings, KeyBindings::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = UserConfig {
            welcome_shown: true,
            delete_on_cull: true,
            keybindings: KeyBindings::default(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: UserConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: UserConfig = serde_json::from_str(r#"{"welcome_shown":true}"#).unwrap();
        assert!(config.welcome_shown);
        assert!(!config.delete_on_cull);
        assert_eq!(config.keybindings, KeyBindings::default());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = UserConfig::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut config = UserConfig::default();
        config.delete_on_cull = true;
        config.keybindings.cull = KeyTrigger::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        config.save_to(&path).unwrap();

        let loaded = UserConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#""cull": "Ctrl+x""#));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = UserConfig::load_from(&path);
        assert!(matches!(result, Err(PicCullError::ConfigError(_))));
    }
}
