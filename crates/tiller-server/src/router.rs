//! Dispatch router — the single task that owns all panel state.
//!
//! Gateway notifications and server commands land in one inbox and are
//! processed strictly one at a time: parse, mutate, broadcast, then the
//! handler call, all before the next notification is considered. The router
//! owns the [`ControlPanel`] and the [`ClientRegistry`] outright, so no
//! locking guards control state.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tiller_core::{ClientId, ControlEvent, ControlId, ControlPanel, ControlValue, PanelError};
use tiller_protocol::{WireMessage, parse_event};

use crate::clients::ClientRegistry;
use crate::gateway::connection::ClientConnection;

/// Addressing for server-initiated updates: by dense id or by label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Address a control by its dense id.
    Id(ControlId),
    /// Address a control by its unique label.
    Label(String),
}

impl From<ControlId> for Target {
    fn from(id: ControlId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Target {
    fn from(label: &str) -> Self {
        Self::Label(label.to_owned())
    }
}

impl From<String> for Target {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

/// Server-initiated state change, enqueued through a
/// [`PanelHandle`](crate::handle::PanelHandle).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replace a label's text.
    SetText {
        /// Addressed control.
        target: Target,
        /// New text.
        text: String,
    },
    /// Flip a switch.
    SetSwitch {
        /// Addressed control.
        target: Target,
        /// New state.
        on: bool,
    },
    /// Move a slider.
    SetSlider {
        /// Addressed control.
        target: Target,
        /// New position.
        value: i64,
    },
}

/// One unit of work for the router inbox.
pub enum Notification {
    /// A client finished the WebSocket upgrade.
    Connect(Arc<ClientConnection>),
    /// A client went away.
    Disconnect(ClientId),
    /// Raw inbound text from a client.
    Message(ClientId, String),
    /// Server-initiated update.
    Command(Command),
}

/// The dispatch router. Created with the panel, consumed by [`Self::run`].
pub struct DispatchRouter {
    panel: ControlPanel,
    clients: ClientRegistry,
    rx: mpsc::Receiver<Notification>,
}

impl DispatchRouter {
    /// Take ownership of the panel and the inbox receiver.
    #[must_use]
    pub fn new(panel: ControlPanel, rx: mpsc::Receiver<Notification>) -> Self {
        Self {
            panel,
            clients: ClientRegistry::new(),
            rx,
        }
    }

    /// The owned panel (current control state).
    #[must_use]
    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// Number of currently registered clients.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.count()
    }

    /// Process notifications until the inbox closes or `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            title = self.panel.title(),
            controls = self.panel.count(),
            "dispatch router started"
        );
        loop {
            tokio::select! {
                notification = self.rx.recv() => match notification {
                    Some(n) => self.process(n),
                    None => break,
                },
                () = cancel.cancelled() => break,
            }
        }
        info!("dispatch router stopped");
    }

    /// Handle one notification to completion.
    pub fn process(&mut self, notification: Notification) {
        match notification {
            Notification::Connect(conn) => self.on_connect(conn),
            Notification::Disconnect(client_id) => self.on_disconnect(&client_id),
            Notification::Message(client_id, text) => self.on_message(&client_id, &text),
            Notification::Command(command) => self.on_command(command),
        }
    }

    fn on_connect(&mut self, conn: Arc<ClientConnection>) {
        let client_id = conn.id.clone();
        self.clients.add(conn);
        info!(%client_id, clients = self.clients.count(), "client connected");
        if let Err(e) = self.full_sync(&client_id) {
            warn!(%client_id, error = %e, "initial sync failed");
        }
    }

    /// Send the Title message, then a Define per control in ascending id
    /// order, to one client only.
    fn full_sync(&self, client_id: &ClientId) -> Result<(), PanelError> {
        self.clients
            .send_to(client_id, &WireMessage::title(self.panel.title()))?;
        for control in self.panel.controls() {
            self.clients.send_to(client_id, &WireMessage::define(control))?;
        }
        debug!(%client_id, controls = self.panel.count(), "full sync sent");
        Ok(())
    }

    fn on_disconnect(&mut self, client_id: &ClientId) {
        if let Some(conn) = self.clients.remove(client_id) {
            info!(
                %client_id,
                dropped = conn.drop_count(),
                clients = self.clients.count(),
                "client disconnected"
            );
        }
    }

    fn on_message(&mut self, client_id: &ClientId, text: &str) {
        let message = match parse_event(text, self.panel.count()) {
            Ok(m) => m,
            Err(e) => {
                warn!(%client_id, code = e.code(), error = %e, "dropping inbound message");
                return;
            }
        };

        let new_value = match message.event {
            ControlEvent::SwitchOn => Some(ControlValue::Bool(true)),
            ControlEvent::SwitchOff => Some(ControlValue::Bool(false)),
            ControlEvent::SliderValue => {
                let Some(v) = message.value else {
                    warn!(%client_id, "dropping slider event without a value");
                    return;
                };
                Some(ControlValue::Int(v))
            }
            _ => None,
        };

        // State changes are applied before the handler runs and rebroadcast
        // to every client except the originator, which already holds the
        // authoritative value locally.
        let snapshot = if let Some(value) = new_value {
            match self.panel.set_value(message.id, value) {
                Ok(control) => {
                    let snapshot = control.clone();
                    if let Some(update) = WireMessage::update(&snapshot) {
                        let _ = self.clients.broadcast_except(Some(client_id), &update);
                    }
                    snapshot
                }
                Err(e) => {
                    warn!(%client_id, code = e.code(), error = %e, "dropping state event");
                    return;
                }
            }
        } else {
            match self.panel.get(message.id) {
                Ok(control) => control.clone(),
                Err(e) => {
                    warn!(%client_id, code = e.code(), error = %e, "dropping event");
                    return;
                }
            }
        };

        debug!(%client_id, control = %snapshot.id, event = %message.event, "dispatching");
        if let Some(handler) = self.panel.handler(message.id) {
            handler(&snapshot, message.event);
        }
    }

    fn on_command(&mut self, command: Command) {
        let (target, value) = match command {
            Command::SetText { target, text } => (target, ControlValue::Text(text)),
            Command::SetSwitch { target, on } => (target, ControlValue::Bool(on)),
            Command::SetSlider { target, value } => (target, ControlValue::Int(value)),
        };
        let id = match self.resolve(&target) {
            Ok(id) => id,
            Err(e) => {
                warn!(code = e.code(), error = %e, "dropping command");
                return;
            }
        };
        match self.panel.set_value(id, value) {
            Ok(control) => {
                if let Some(update) = WireMessage::update(control) {
                    let _ = self.clients.broadcast_all(&update);
                }
            }
            Err(e) => warn!(code = e.code(), error = %e, "dropping command"),
        }
    }

    fn resolve(&self, target: &Target) -> Result<ControlId, PanelError> {
        match target {
            Target::Id(id) => self.panel.get(*id).map(|c| c.id),
            Target::Label(label) => self.panel.find_by_label(label),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
