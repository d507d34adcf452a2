use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Onboarding slides already seen; later launches jump to profiles.
    #[serde(default)]
    pub onboarding_done: bool,

    /// Last selected viewing profile, restored at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_profile: Option<String>,

    /// Player volume, 0-100.
    #[serde(default = "default_volume")]
    pub volume: u8,

    /// Mirror success toasts as desktop notifications.
    #[serde(default)]
    pub desktop_notifications: bool,
}

fn default_volume() -> u8 {
    80
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            onboarding_done: false,
            last_profile: None,
            volume: default_volume(),
            desktop_notifications: false,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("famstream");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Clean up the config before saving
        let mut clean_config = self.clone();
        clean_config.volume = clean_config.volume.min(100);
        if clean_config
            .last_profile
            .as_ref()
            .map(|s| s.trim().is_empty())
            .unwrap_or(false)
        {
            clean_config.last_profile = None;
        }

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            onboarding_done: true,
            last_profile: Some("Maria Petrova".to_string()),
            volume: 65,
            desktop_notifications: true,
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.onboarding_done, deserialized.onboarding_done);
        assert_eq!(config.last_profile, deserialized.last_profile);
        assert_eq!(config.volume, deserialized.volume);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AppConfig = toml::from_str("onboarding_done = true").unwrap();
        assert_eq!(config.volume, 80);
        assert!(config.last_profile.is_none());
        assert!(!config.desktop_notifications);
    }
}
