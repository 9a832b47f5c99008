use std::sync::Arc;
use std::time::Duration;

use adw::prelude::*;
use adw::subclass::prelude::*;
use async_channel::{Receiver, Sender};
use gtk::glib;

use super::host::HostBridge;
use super::types::{ConfigStatus, DeviceConfig, OutboundMessage};

/// How long a save may wait for the device to confirm before it fails.
pub const SAVE_ACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Commands sent from UI to the bridge loop
#[derive(Debug, Clone)]
pub enum BridgeCommand {
    /// Shutdown the bridge loop gracefully
    Shutdown,
    Ready,
    Expand,
    EnableClosingConfirmation,
    Close,
    /// Ask the bot for the current device configuration
    QueryStatus,
    SendConfig(DeviceConfig),
}

/// Events sent from the bridge loop to UI
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    Status(ConfigStatus),
    SendFailed { message: String },
    Closed,
}

mod imp {
    use super::{BridgeCommand, Sender};
    use crate::bridge::SaveFlow;
    use adw::prelude::*;
    use adw::subclass::prelude::*;
    use gtk::glib;
    use std::cell::{Cell, RefCell};
    use std::sync::OnceLock;

    #[derive(Default)]
    pub struct DevconfigManager {
        pub flow: RefCell<SaveFlow>,
        pub busy: Cell<bool>,
        pub cmd_tx: OnceLock<Sender<BridgeCommand>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for DevconfigManager {
        const NAME: &'static str = "DevconfigManager";
        type Type = super::DevconfigManager;
        type ParentType = glib::Object;
    }

    impl ObjectImpl for DevconfigManager {
        fn dispose(&self) {
            tracing::debug!("DevconfigManager disposing, sending shutdown");
            if let Some(tx) = self.cmd_tx.get() {
                let _ = tx.try_send(BridgeCommand::Shutdown);
            }
        }

        fn properties() -> &'static [glib::ParamSpec] {
            static PROPERTIES: OnceLock<Vec<glib::ParamSpec>> = OnceLock::new();
            PROPERTIES.get_or_init(|| {
                vec![glib::ParamSpecBoolean::builder("busy")
                    .read_only()
                    .build()]
            })
        }

        fn signals() -> &'static [glib::subclass::Signal] {
            static SIGNALS: OnceLock<Vec<glib::subclass::Signal>> = OnceLock::new();
            SIGNALS.get_or_init(|| {
                vec![
                    glib::subclass::Signal::builder("status-received")
                        .param_types([
                            String::static_type(), // mode
                            String::static_type(), // wifi ssid ("" = absent)
                            String::static_type(), // chat id ("" = absent)
                        ])
                        .build(),
                    glib::subclass::Signal::builder("save-complete").build(),
                    glib::subclass::Signal::builder("save-error")
                        .param_types([String::static_type()])
                        .build(),
                    glib::subclass::Signal::builder("close-requested").build(),
                ]
            })
        }

        fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
            match pspec.name() {
                "busy" => self.busy.get().to_value(),
                _ => unimplemented!(),
            }
        }
    }
}

glib::wrapper! {
    pub struct DevconfigManager(ObjectSubclass<imp::DevconfigManager>);
}

impl Default for DevconfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DevconfigManager {
    pub fn new() -> Self {
        glib::Object::new()
    }

    pub fn start(&self, bridge: Arc<dyn HostBridge>) {
        let (cmd_tx, cmd_rx) = async_channel::bounded::<BridgeCommand>(32);
        let (evt_tx, evt_rx) = async_channel::bounded::<BridgeEvent>(32);

        self.imp().cmd_tx.set(cmd_tx).unwrap();

        // Spawn bridge task
        super::runtime().spawn(async move {
            if let Err(e) = run_bridge(bridge, cmd_rx, evt_tx).await {
                tracing::error!("Bridge error: {}", e);
            }
        });

        // Handle events on GTK main thread
        let manager = self.clone();
        glib::spawn_future_local(async move {
            while let Ok(event) = evt_rx.recv().await {
                manager.handle_event(event);
            }
        });
    }

    fn handle_event(&self, event: BridgeEvent) {
        match event {
            BridgeEvent::Status(status) => {
                // A status push while a save is pending is the device's ack
                if self.imp().flow.borrow_mut().acknowledge() {
                    self.set_busy(false);
                    self.emit_by_name::<()>("save-complete", &[]);
                }
                let ssid = status.wifi_ssid.unwrap_or_default();
                let chat_id = status.chat_id.unwrap_or_default();
                self.emit_by_name::<()>(
                    "status-received",
                    &[&status.mode.as_str().to_string(), &ssid, &chat_id],
                );
            }
            BridgeEvent::SendFailed { message } => {
                tracing::error!("Send failed: {}", message);
                self.imp().flow.borrow_mut().acknowledge();
                self.set_busy(false);
                let banner = format!("Failed to save configuration: {message}");
                self.emit_by_name::<()>("save-error", &[&banner]);
            }
            BridgeEvent::Closed => {
                self.emit_by_name::<()>("close-requested", &[]);
            }
        }
    }

    pub fn busy(&self) -> bool {
        self.imp().busy.get()
    }

    fn set_busy(&self, busy: bool) {
        if self.imp().busy.get() != busy {
            self.imp().busy.set(busy);
            self.notify("busy");
        }
    }

    /// Validated configuration goes out through the bridge. Returns false if
    /// a save is already pending.
    pub fn save_config(&self, config: DeviceConfig) -> bool {
        let token = match self.imp().flow.borrow_mut().begin() {
            Some(token) => token,
            None => {
                tracing::debug!("Save already in flight, ignoring");
                return false;
            }
        };

        self.set_busy(true);
        self.send_command(BridgeCommand::SendConfig(config));

        glib::timeout_add_local_once(
            SAVE_ACK_TIMEOUT,
            glib::clone!(
                #[weak(rename_to = manager)]
                self,
                move || {
                    if manager.imp().flow.borrow_mut().expire(token) {
                        tracing::warn!("Save timed out waiting for device ack");
                        manager.set_busy(false);
                        manager.emit_by_name::<()>(
                            "save-error",
                            &[&"Device did not confirm the new configuration".to_string()],
                        );
                    }
                }
            ),
        );
        true
    }

    pub fn request_status(&self) {
        self.send_command(BridgeCommand::QueryStatus);
    }

    pub fn request_expand(&self) {
        self.send_command(BridgeCommand::Expand);
    }

    pub fn request_enable_closing_confirmation(&self) {
        self.send_command(BridgeCommand::EnableClosingConfirmation);
    }

    pub fn announce_ready(&self) {
        self.send_command(BridgeCommand::Ready);
    }

    pub fn request_close(&self) {
        self.send_command(BridgeCommand::Close);
    }

    fn send_command(&self, cmd: BridgeCommand) {
        if let Some(tx) = self.imp().cmd_tx.get() {
            let tx = tx.clone();
            glib::spawn_future_local(async move {
                if let Err(e) = tx.send(cmd).await {
                    tracing::error!("Failed to send command: {}", e);
                }
            });
        }
    }
}

async fn run_bridge(
    bridge: Arc<dyn HostBridge>,
    cmd_rx: Receiver<BridgeCommand>,
    evt_tx: Sender<BridgeEvent>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let status_rx = bridge.status_messages();
    let mut status_open = true;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Ok(cmd) = cmd else { break };
                match cmd {
                    BridgeCommand::Shutdown => break,
                    BridgeCommand::Ready => {
                        if let Err(e) = bridge.ready() {
                            tracing::warn!("Ready call failed: {}", e);
                        }
                    }
                    BridgeCommand::Expand => {
                        if let Err(e) = bridge.expand() {
                            tracing::warn!("Expand call failed: {}", e);
                        }
                    }
                    BridgeCommand::EnableClosingConfirmation => {
                        if let Err(e) = bridge.enable_closing_confirmation() {
                            tracing::warn!("Closing confirmation call failed: {}", e);
                        }
                    }
                    BridgeCommand::Close => {
                        if let Err(e) = bridge.close() {
                            tracing::warn!("Close call failed: {}", e);
                        }
                        evt_tx.send(BridgeEvent::Closed).await?;
                    }
                    BridgeCommand::QueryStatus => {
                        let payload = serde_json::to_string(&OutboundMessage::GetStatus)?;
                        if let Err(e) = bridge.send_data(&payload) {
                            tracing::warn!("Status query failed: {}", e);
                        }
                    }
                    BridgeCommand::SendConfig(config) => {
                        let payload = serde_json::to_string(&OutboundMessage::save(config))?;
                        if let Err(e) = bridge.send_data(&payload) {
                            evt_tx.send(BridgeEvent::SendFailed { message: e.to_string() }).await?;
                        }
                    }
                }
            }
            status = status_rx.recv(), if status_open => {
                match status {
                    Ok(status) => evt_tx.send(BridgeEvent::Status(status)).await?,
                    // Host closed its end of the pipe; keep serving commands
                    Err(_) => status_open = false,
                }
            }
        }
    }

    tracing::info!("Bridge loop terminated");
    Ok(())
}
