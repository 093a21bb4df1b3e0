use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::policy::PolicyLimits;

/// Optional on-disk configuration. Everything has a sensible default, so the
/// bot runs without any config file at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Download limits
    pub limits: PolicyLimits,

    /// Path to the yt-dlp binary
    pub ytdlp: YtDlpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YtDlpConfig {
    pub path: String,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            path: "yt-dlp".to_string(),
        }
    }
}

/// Resolved process configuration, read-only after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub limits: PolicyLimits,
    pub ytdlp_path: String,
}

impl Config {
    /// Load configuration: optional `config.yaml` plus the required
    /// `BOT_TOKEN` environment variable.
    pub fn load() -> Result<Self> {
        let file = Self::load_file()?;

        let bot_token = std::env::var("BOT_TOKEN").context(
            "BOT_TOKEN is not set. Create a bot with @BotFather and export its token:\n  \
             export BOT_TOKEN=123456789:AA...",
        )?;

        Ok(Self {
            bot_token,
            limits: file.limits,
            ytdlp_path: file.ytdlp.path,
        })
    }

    fn load_file() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        if !path.exists() {
            return Ok(FileConfig::default());
        }

        let content = fs_err::read_to_string(&path).context("Failed to read config file")?;

        let config: FileConfig =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Configuration file path: current directory first for easy testing,
    /// then the platform config directory.
    fn config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir().map(|dir| dir.join("yt-audio-bot").join("config.yaml"))
    }
}
