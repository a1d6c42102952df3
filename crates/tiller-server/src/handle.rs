//! Server-side update API.
//!
//! A [`PanelHandle`] is a cloneable sender onto the dispatch router's inbox.
//! Updates enqueued here are serialized with client traffic on the router
//! task, so server code never races a client interaction for the panel.

use tokio::sync::mpsc;

use tiller_core::PanelError;

use crate::router::{Command, Notification, Target};

/// Cloneable handle for pushing server-initiated state changes.
///
/// Resulting updates are broadcast to every connected client, since there is
/// no originating client to exclude.
#[derive(Clone)]
pub struct PanelHandle {
    tx: mpsc::Sender<Notification>,
}

impl PanelHandle {
    pub(crate) fn new(tx: mpsc::Sender<Notification>) -> Self {
        Self { tx }
    }

    /// Replace the text of a label control, addressed by id or label.
    pub async fn set_text(
        &self,
        target: impl Into<Target>,
        text: impl Into<String>,
    ) -> Result<(), PanelError> {
        self.send(Command::SetText {
            target: target.into(),
            text: text.into(),
        })
        .await
    }

    /// Flip a switch control, addressed by id or label.
    pub async fn set_switch(
        &self,
        target: impl Into<Target>,
        on: bool,
    ) -> Result<(), PanelError> {
        self.send(Command::SetSwitch {
            target: target.into(),
            on,
        })
        .await
    }

    /// Move a slider control, addressed by id or label.
    pub async fn set_slider(
        &self,
        target: impl Into<Target>,
        value: i64,
    ) -> Result<(), PanelError> {
        self.send(Command::SetSlider {
            target: target.into(),
            value,
        })
        .await
    }

    async fn send(&self, command: Command) -> Result<(), PanelError> {
        self.tx
            .send(Notification::Command(command))
            .await
            .map_err(|_| PanelError::RouterClosed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
