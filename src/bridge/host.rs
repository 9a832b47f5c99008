//! Host bridge capability: theme parameters, lifecycle calls and the payload
//! channel. The UI never talks to the host directly; it goes through the
//! [`HostBridge`] trait so tests can substitute a fake.

use std::io::{self, Write};

use async_channel::Receiver;
use serde_json::json;
use tokio::io::AsyncBufReadExt;

use super::runtime;
use super::types::{ConfigStatus, InboundMessage};

/// Theme colors supplied by the host. Every value is optional; missing ones
/// fall back to the stock palette.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub background: Option<String>,
    pub text: Option<String>,
    pub hint: Option<String>,
    pub link: Option<String>,
    pub button: Option<String>,
    pub button_text: Option<String>,
    pub secondary_background: Option<String>,
}

impl Theme {
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.is_empty())
        }
        Self {
            background: var("DEVCONFIG_BG_COLOR"),
            text: var("DEVCONFIG_TEXT_COLOR"),
            hint: var("DEVCONFIG_HINT_COLOR"),
            link: var("DEVCONFIG_LINK_COLOR"),
            button: var("DEVCONFIG_BUTTON_COLOR"),
            button_text: var("DEVCONFIG_BUTTON_TEXT_COLOR"),
            secondary_background: var("DEVCONFIG_SECONDARY_BG_COLOR"),
        }
    }

    /// Named-color definitions consumed by the static stylesheet.
    pub fn css(&self) -> String {
        let color = |value: &Option<String>, fallback: &str| -> String {
            value.as_deref().unwrap_or(fallback).to_owned()
        };
        format!(
            "@define-color devcfg_bg {};\n\
             @define-color devcfg_text {};\n\
             @define-color devcfg_hint {};\n\
             @define-color devcfg_link {};\n\
             @define-color devcfg_button {};\n\
             @define-color devcfg_button_text {};\n\
             @define-color devcfg_secondary_bg {};\n",
            color(&self.background, "#ffffff"),
            color(&self.text, "#000000"),
            color(&self.hint, "#707579"),
            color(&self.link, "#3390ec"),
            color(&self.button, "#3390ec"),
            color(&self.button_text, "#ffffff"),
            color(&self.secondary_background, "#f4f4f5"),
        )
    }
}

/// Capability set provided by the mini-app host.
pub trait HostBridge: Send + Sync {
    fn theme(&self) -> Theme;

    /// Opaque init payload. Read but otherwise unused.
    fn init_data(&self) -> Option<String>;

    fn ready(&self) -> io::Result<()>;
    fn expand(&self) -> io::Result<()>;
    fn enable_closing_confirmation(&self) -> io::Result<()>;
    fn close(&self) -> io::Result<()>;

    /// Transmit one UTF-8 JSON payload to the backend. Fire-and-forget: an Ok
    /// return means the payload left the process, not that it was delivered.
    fn send_data(&self, payload: &str) -> io::Result<()>;

    /// Stream of recognized configuration status messages from the host.
    fn status_messages(&self) -> Receiver<ConfigStatus>;
}

/// Production bridge: JSON lines over the process pipes set up by the host.
/// `send_data` payloads go to stdout verbatim, one object per line; lifecycle
/// calls are framed as `{"type":"lifecycle","event":...}`. Inbound messages
/// arrive as JSON lines on stdin.
pub struct StdioBridge {
    status_rx: Receiver<ConfigStatus>,
}

impl StdioBridge {
    pub fn new() -> Self {
        let (tx, rx) = async_channel::unbounded();
        runtime().spawn(async move {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut lines = stdin.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                // Unrecognized or malformed lines are dropped without logging
                let Some(status) = InboundMessage::parse(&line) else {
                    continue;
                };
                if tx.send(status).await.is_err() {
                    break;
                }
            }
        });
        Self { status_rx: rx }
    }

    fn write_line(line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()
    }

    fn lifecycle(event: &str) -> io::Result<()> {
        let frame = json!({"type": "lifecycle", "event": event});
        Self::write_line(&frame.to_string())
    }
}

impl Default for StdioBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBridge for StdioBridge {
    fn theme(&self) -> Theme {
        Theme::from_env()
    }

    fn init_data(&self) -> Option<String> {
        std::env::var("DEVCONFIG_INIT_DATA").ok().filter(|v| !v.is_empty())
    }

    fn ready(&self) -> io::Result<()> {
        Self::lifecycle("ready")
    }

    fn expand(&self) -> io::Result<()> {
        Self::lifecycle("expand")
    }

    fn enable_closing_confirmation(&self) -> io::Result<()> {
        Self::lifecycle("enable_closing_confirmation")
    }

    fn close(&self) -> io::Result<()> {
        Self::lifecycle("close")
    }

    fn send_data(&self, payload: &str) -> io::Result<()> {
        Self::write_line(payload)
    }

    fn status_messages(&self) -> Receiver<ConfigStatus> {
        self.status_rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_theme_falls_back_to_stock_palette() {
        let css = Theme::default().css();
        assert!(css.contains("@define-color devcfg_bg #ffffff;"));
        assert!(css.contains("@define-color devcfg_text #000000;"));
        assert!(css.contains("@define-color devcfg_hint #707579;"));
        assert!(css.contains("@define-color devcfg_link #3390ec;"));
        assert!(css.contains("@define-color devcfg_button #3390ec;"));
        assert!(css.contains("@define-color devcfg_button_text #ffffff;"));
        assert!(css.contains("@define-color devcfg_secondary_bg #f4f4f5;"));
    }

    #[test]
    fn host_colors_override_fallbacks() {
        let theme = Theme {
            background: Some("#1e1e1e".into()),
            button: Some("#aa33cc".into()),
            ..Default::default()
        };
        let css = theme.css();
        assert!(css.contains("@define-color devcfg_bg #1e1e1e;"));
        assert!(css.contains("@define-color devcfg_button #aa33cc;"));
        // Untouched entries still fall back
        assert!(css.contains("@define-color devcfg_text #000000;"));
    }
}
