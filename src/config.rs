use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{api::ApiConfig, application::saver::SaveTarget};

const APP_NAME: &str = "simple-video-downloader";
const CONFIG_NAME: &str = "config";
const SERVER_ENV: &str = "VIDEO_DOWNLOADER_SERVER";

pub const QUALITIES: [&str; 4] = ["1080p", "720p", "480p", "360p"];
pub const BITRATES: [&str; 3] = ["320", "192", "128"];

/// User settings, stored as TOML in the platform config directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub default_quality: String,
    pub default_bitrate: String,
    pub always_ask_path: bool,
    pub download_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: ApiConfig::default().base_url,
            default_quality: "720p".to_string(),
            default_bitrate: "192".to_string(),
            always_ask_path: true,
            download_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl Settings {
    /// Load from disk, falling back to defaults, then apply environment overrides
    pub fn load() -> Self {
        let loaded: Result<Settings, _> = confy::load(APP_NAME, CONFIG_NAME);
        let settings = match loaded {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "failed to load config, using defaults");
                Settings::default()
            }
        };

        let settings = settings.with_server_override(std::env::var(SERVER_ENV).ok());
        info!(server = %settings.server_url, "settings loaded");
        settings
    }

    fn with_server_override(mut self, server: Option<String>) -> Self {
        if let Some(server) = server.filter(|server| !server.trim().is_empty()) {
            self.server_url = server.trim().to_string();
        }
        self
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.server_url.clone(),
        }
    }

    pub fn save_target(&self) -> SaveTarget {
        if self.always_ask_path {
            SaveTarget::Ask
        } else {
            SaveTarget::Directory(self.download_dir.clone())
        }
    }
}
