//! Form input validation, kept free of widget types so it can be unit tested.

use std::fmt;

use crate::bridge::types::{DeviceConfig, Mode, TelegramCredentials};

/// Raw field contents as read from the form.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub mode: Mode,
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    WifiCredentials,
    BotCredentials,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ValidationError::WifiCredentials => "Please enter WiFi credentials",
            ValidationError::BotCredentials => "Please enter Telegram bot credentials",
        };
        f.write_str(message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate the form and build the configuration to transmit.
///
/// The default mode never requires credentials. For Telegram mode the WiFi
/// pair is checked before the bot pair; ssid, token and chat id are trimmed,
/// the password is taken verbatim.
pub fn validate(input: &FormInput) -> Result<DeviceConfig, ValidationError> {
    if input.mode == Mode::Default {
        return Ok(DeviceConfig::Default);
    }

    let wifi_ssid = input.wifi_ssid.trim();
    if wifi_ssid.is_empty() || input.wifi_password.is_empty() {
        return Err(ValidationError::WifiCredentials);
    }

    let bot_token = input.bot_token.trim();
    let chat_id = input.chat_id.trim();
    if bot_token.is_empty() || chat_id.is_empty() {
        return Err(ValidationError::BotCredentials);
    }

    Ok(DeviceConfig::Telegram(TelegramCredentials {
        wifi_ssid: wifi_ssid.to_owned(),
        wifi_password: input.wifi_password.clone(),
        bot_token: bot_token.to_owned(),
        chat_id: chat_id.to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telegram_input() -> FormInput {
        FormInput {
            mode: Mode::Telegram,
            wifi_ssid: "home".into(),
            wifi_password: "p".into(),
            bot_token: "t".into(),
            chat_id: "c".into(),
        }
    }

    #[test]
    fn default_mode_needs_no_credentials() {
        let input = FormInput {
            mode: Mode::Default,
            ..Default::default()
        };
        assert_eq!(validate(&input), Ok(DeviceConfig::Default));
    }

    #[test]
    fn wifi_check_fires_before_bot_check() {
        let input = FormInput {
            mode: Mode::Telegram,
            ..Default::default()
        };
        assert_eq!(validate(&input), Err(ValidationError::WifiCredentials));
    }

    #[test]
    fn whitespace_only_ssid_is_rejected() {
        let mut input = telegram_input();
        input.wifi_ssid = "   ".into();
        assert_eq!(validate(&input), Err(ValidationError::WifiCredentials));
    }

    #[test]
    fn missing_bot_credentials_are_reported_second() {
        let mut input = telegram_input();
        input.bot_token.clear();
        assert_eq!(validate(&input), Err(ValidationError::BotCredentials));

        let mut input = telegram_input();
        input.chat_id = "  ".into();
        assert_eq!(validate(&input), Err(ValidationError::BotCredentials));
    }

    #[test]
    fn ssid_is_trimmed_but_password_is_not() {
        let mut input = telegram_input();
        input.wifi_ssid = " home ".into();
        input.wifi_password = " p ".into();
        let config = validate(&input).unwrap();
        match config {
            DeviceConfig::Telegram(credentials) => {
                assert_eq!(credentials.wifi_ssid, "home");
                assert_eq!(credentials.wifi_password, " p ");
            }
            other => panic!("unexpected config: {other:?}"),
        }
    }

    #[test]
    fn error_messages_name_the_missing_category() {
        assert_eq!(
            ValidationError::WifiCredentials.to_string(),
            "Please enter WiFi credentials"
        );
        assert_eq!(
            ValidationError::BotCredentials.to_string(),
            "Please enter Telegram bot credentials"
        );
    }
}
