use chrono::{DateTime, Local, Utc};

use gasguard_core::config::TelegramConfig;
use gasguard_core::reading::Reading;
use gasguard_core::types::AlertLevel;

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Outbound notification sink (Telegram bot API).
///
/// Delivery is best-effort: callers spawn `send` and log failures; nothing
/// on the ingestion or control path waits on it.
pub struct Notifier {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

impl Notifier {
    pub fn new(config: &TelegramConfig) -> Self {
        Self::with_base_url(config, TELEGRAM_API)
    }

    /// Base URL is injectable so tests can point at a local mock server.
    pub fn with_base_url(config: &TelegramConfig, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }

    /// Send a plain-text message to the configured chat.
    pub async fn send(&self, text: &str) -> anyhow::Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("telegram API returned {status}: {body}");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Message formatting
// ---------------------------------------------------------------------------

fn level_label(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Safe => "safe",
        AlertLevel::Warn => "warning",
        AlertLevel::Danger => "DANGER",
    }
}

fn format_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render the notification text for an alert-edge reading.
pub fn format_alert_message(reading: &Reading) -> String {
    let headline = if reading.alert1 == AlertLevel::Danger || reading.alert2 == AlertLevel::Danger {
        "DANGER ALERT"
    } else if reading.has_alert() {
        "Warning"
    } else {
        "All clear"
    };

    format!(
        "{headline}\n\
         Time: {}\n\
         Group 1: sensor {:.0}, level {}, actuator {}\n\
         Group 2: sensor {:.0}, level {}, actuator {}",
        format_time(reading.captured_at),
        reading.sensor1,
        level_label(reading.alert1),
        reading.actuator1,
        reading.sensor2,
        level_label(reading.alert2),
        reading.actuator2,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
