// Configuration management for tunedeck
// Handles loading/saving settings, with sensible defaults when config is missing

use anyhow::{Context, Result};
use dirs::{config_dir, data_dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "tunedeck";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recent_file: PathBuf,
    pub log_dir: PathBuf,
    pub spotify: SpotifyConfig,
    pub player: PlayerConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub search_limit: u32,
    pub market: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,      // MPRIS player name passed to `playerctl -p`
    pub playerctl: String, // program to invoke
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub refresh_interval_secs: u64, // 0 disables periodic now-playing refresh
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            search_limit: 10,
            market: None,
            request_timeout_secs: 10,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "spotify".to_string(),
            playerctl: "playerctl".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        Self {
            recent_file: data_dir.join("recent.txt"),
            log_dir: data_dir.join("logs"),
            spotify: SpotifyConfig::default(),
            player: PlayerConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path, writing defaults there if nothing exists yet
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config {}", config_path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse config {}", config_path.display()))?
        } else {
            let config = Config::default();
            config.save_to(config_path)?;
            config
        };

        config.apply_env();
        config.spotify.search_limit = config.spotify.search_limit.clamp(1, 50);
        Ok(config)
    }

    /// Credentials from the environment win over the file
    fn apply_env(&mut self) {
        if let Ok(id) = std::env::var("SPOTIFY_CLIENT_ID") {
            if !id.is_empty() {
                self.spotify.client_id = Some(id);
            }
        }
        if let Ok(secret) = std::env::var("SPOTIFY_CLIENT_SECRET") {
            if !secret.is_empty() {
                self.spotify.client_secret = Some(secret);
            }
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }
}
