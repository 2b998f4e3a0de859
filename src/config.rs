use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the bot token
pub const TOKEN_ENV: &str = "PROOFBOT_TOKEN";
/// Environment variable that overrides the LanguageTool server URL
pub const LANGUAGETOOL_URL_ENV: &str = "LANGUAGETOOL_URL";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Telegram
    pub bot_token: String,

    // Grammar checking
    pub checker_language: String,
    pub languagetool_url: String,
    pub check_timeout_secs: u64,
    pub languagetool_autostart: bool,
    pub languagetool_jar: String,

    // OCR
    pub ocr_language: String,
    pub tesseract_cmd: String,

    // Pipeline
    pub keep_trailing_fragment: bool,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            checker_language: "ru-RU".to_string(),
            languagetool_url: "http://localhost:8081".to_string(),
            check_timeout_secs: 15,
            languagetool_autostart: false,
            languagetool_jar: dirs::data_dir()
                .unwrap_or_default()
                .join("proofbot/LanguageTool/languagetool-server.jar")
                .to_string_lossy()
                .to_string(),
            ocr_language: "rus".to_string(),
            tesseract_cmd: "tesseract".to_string(),
            keep_trailing_fragment: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path.
    ///
    /// A missing file yields defaults. A file that fails to parse is moved
    /// aside to `*.json.corrupt` and defaults are used instead.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `PROOFBOT_TOKEN` / `LANGUAGETOOL_URL` overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(TOKEN_ENV).ok(),
            std::env::var(LANGUAGETOOL_URL_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, token: Option<String>, languagetool_url: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.bot_token = token.trim().to_string();
        }
        if let Some(url) = languagetool_url.filter(|u| !u.trim().is_empty()) {
            self.languagetool_url = url.trim().trim_end_matches('/').to_string();
        }
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs.max(1))
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("proofbot")
        .join("config.json")
}
