use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

// ---------------------------------------------------------------------------
// TelegramConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// ScheduleChecker cadence in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Capacity of the in-memory reading history.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Outbound notification sink; notifications are disabled when absent.
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

fn default_port() -> u16 {
    8090
}

fn default_poll_interval() -> u64 {
    60
}

fn default_max_history() -> usize {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            poll_interval_secs: default_poll_interval(),
            max_history: default_max_history(),
            telegram: None,
        }
    }
}

impl Config {
    /// Load from a YAML file, falling back to defaults when the file is
    /// absent. `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID` environment
    /// variables override the file's telegram section.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let data = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&data)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let (Ok(bot_token), Ok(chat_id)) = (
            std::env::var("TELEGRAM_BOT_TOKEN"),
            std::env::var("TELEGRAM_CHAT_ID"),
        ) {
            if !bot_token.is_empty() && !chat_id.is_empty() {
                self.telegram = Some(TelegramConfig { bot_token, chat_id });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("gasguard.yaml")).unwrap();
        assert_eq!(config.port, 8090);
        assert_eq!(config.poll_interval_secs, 60);
        assert_eq!(config.max_history, 1000);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gasguard.yaml");
        std::fs::write(&path, "port: 9000\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_history, 1000);
    }

    #[test]
    fn telegram_section_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gasguard.yaml");
        std::fs::write(
            &path,
            "telegram:\n  bot_token: \"123:abc\"\n  chat_id: \"-100\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let tg = config.telegram.expect("telegram configured");
        assert_eq!(tg.bot_token, "123:abc");
        assert_eq!(tg.chat_id, "-100");
    }
}
