//! Wire data types exchanged with the bot through the host bridge.

use serde::{Deserialize, Serialize};

/// Device operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    #[default]
    Default,
    Telegram,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Default => "DEFAULT",
            Mode::Telegram => "TELEGRAM",
        }
    }

    /// Anything other than the Telegram tag reads as the default mode.
    pub fn parse(s: &str) -> Self {
        if s == "TELEGRAM" {
            Mode::Telegram
        } else {
            Mode::Default
        }
    }

    /// Fixed status label shown for this mode.
    pub fn status_label(self) -> &'static str {
        match self {
            Mode::Telegram => "📡 TELEGRAM Mode Active",
            Mode::Default => "📱 DEFAULT Mode Active",
        }
    }

    /// Position in the mode selector's string list.
    pub fn selector_index(self) -> u32 {
        match self {
            Mode::Default => 0,
            Mode::Telegram => 1,
        }
    }

    pub fn from_selector_index(index: u32) -> Self {
        match index {
            1 => Mode::Telegram,
            _ => Mode::Default,
        }
    }
}

/// Credentials required when the device runs in Telegram mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelegramCredentials {
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub bot_token: String,
    pub chat_id: String,
}

/// A validated device configuration. Credentials exist if and only if the
/// mode is Telegram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceConfig {
    Default,
    Telegram(TelegramCredentials),
}

impl DeviceConfig {
    pub fn mode(&self) -> Mode {
        match self {
            DeviceConfig::Default => Mode::Default,
            DeviceConfig::Telegram(_) => Mode::Telegram,
        }
    }
}

/// Outbound payload, one JSON object per `send_data` call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OutboundMessage {
    GetStatus,
    SaveConfig {
        mode: Mode,
        #[serde(flatten, skip_serializing_if = "Option::is_none")]
        credentials: Option<TelegramCredentials>,
    },
}

impl OutboundMessage {
    pub fn save(config: DeviceConfig) -> Self {
        let mode = config.mode();
        let credentials = match config {
            DeviceConfig::Default => None,
            DeviceConfig::Telegram(credentials) => Some(credentials),
        };
        OutboundMessage::SaveConfig { mode, credentials }
    }
}

/// Status pushed by the bot. Applied as a full overwrite, never a merge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigStatus {
    #[serde(default, deserialize_with = "lenient_mode")]
    pub mode: Mode,
    pub wifi_ssid: Option<String>,
    pub chat_id: Option<String>,
}

/// A status with an unknown mode tag still carries usable fields, so the mode
/// falls back to default instead of failing the whole payload.
fn lenient_mode<'de, D>(deserializer: D) -> Result<Mode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(Mode::parse(&s))
}

/// Envelope for messages arriving from the host.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    ConfigStatus { data: ConfigStatus },
}

impl InboundMessage {
    /// Extract a status payload from one inbound line. Unrecognized or
    /// malformed lines yield `None` and are dropped by the caller.
    pub fn parse(line: &str) -> Option<ConfigStatus> {
        match serde_json::from_str(line) {
            Ok(InboundMessage::ConfigStatus { data }) => Some(data),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_status_payload_shape() {
        let value = serde_json::to_value(OutboundMessage::GetStatus).unwrap();
        assert_eq!(value, json!({"action": "get_status"}));
    }

    #[test]
    fn save_config_telegram_payload_is_flat() {
        let config = DeviceConfig::Telegram(TelegramCredentials {
            wifi_ssid: "home".into(),
            wifi_password: "p".into(),
            bot_token: "t".into(),
            chat_id: "c".into(),
        });
        let value = serde_json::to_value(OutboundMessage::save(config)).unwrap();
        assert_eq!(
            value,
            json!({
                "action": "save_config",
                "mode": "TELEGRAM",
                "wifi_ssid": "home",
                "wifi_password": "p",
                "bot_token": "t",
                "chat_id": "c",
            })
        );
    }

    #[test]
    fn save_config_default_omits_credentials() {
        let value = serde_json::to_value(OutboundMessage::save(DeviceConfig::Default)).unwrap();
        assert_eq!(value, json!({"action": "save_config", "mode": "DEFAULT"}));
    }

    #[test]
    fn status_parses_all_fields() {
        let status = InboundMessage::parse(
            r#"{"type":"config_status","data":{"mode":"TELEGRAM","wifi_ssid":"net1","chat_id":"123"}}"#,
        )
        .unwrap();
        assert_eq!(status.mode, Mode::Telegram);
        assert_eq!(status.wifi_ssid.as_deref(), Some("net1"));
        assert_eq!(status.chat_id.as_deref(), Some("123"));
    }

    #[test]
    fn status_without_mode_defaults() {
        let status =
            InboundMessage::parse(r#"{"type":"config_status","data":{"wifi_ssid":"net1"}}"#)
                .unwrap();
        assert_eq!(status.mode, Mode::Default);
        assert_eq!(status.chat_id, None);
    }

    #[test]
    fn status_with_unknown_mode_falls_back_to_default() {
        let status = InboundMessage::parse(
            r#"{"type":"config_status","data":{"mode":"WEIRD","wifi_ssid":"net1","chat_id":"123"}}"#,
        )
        .unwrap();
        assert_eq!(status.mode, Mode::Default);
        assert_eq!(status.wifi_ssid.as_deref(), Some("net1"));
        assert_eq!(status.chat_id.as_deref(), Some("123"));
    }

    #[test]
    fn unrecognized_messages_are_dropped() {
        assert!(InboundMessage::parse(r#"{"type":"something_else","data":{}}"#).is_none());
        assert!(InboundMessage::parse("not json").is_none());
        assert!(InboundMessage::parse(r#"{"data":{}}"#).is_none());
    }

    #[test]
    fn mode_labels_and_parsing() {
        assert_eq!(Mode::parse("TELEGRAM"), Mode::Telegram);
        assert_eq!(Mode::parse("DEFAULT"), Mode::Default);
        assert_eq!(Mode::parse("garbage"), Mode::Default);
        assert_eq!(Mode::Telegram.status_label(), "📡 TELEGRAM Mode Active");
        assert_eq!(Mode::Default.status_label(), "📱 DEFAULT Mode Active");
        assert_eq!(Mode::from_selector_index(Mode::Telegram.selector_index()), Mode::Telegram);
    }
}
