//! Connected-client registry and message fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use tiller_core::{ClientId, PanelError};
use tiller_protocol::WireMessage;

use crate::gateway::connection::ClientConnection;

/// The set of connected clients, owned by the dispatch router task.
///
/// Delivery is per-client `try_send` into a bounded queue: one unreachable
/// client (disconnected mid-broadcast, or a full queue) is logged and
/// skipped, and never aborts delivery to the rest.
#[derive(Default)]
pub struct ClientRegistry {
    connections: HashMap<ClientId, Arc<ClientConnection>>,
}

impl ClientRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection.
    pub fn add(&mut self, connection: Arc<ClientConnection>) {
        let _ = self.connections.insert(connection.id.clone(), connection);
    }

    /// Remove a connection by ID.
    pub fn remove(&mut self, client_id: &ClientId) -> Option<Arc<ClientConnection>> {
        self.connections.remove(client_id)
    }

    /// Number of connected clients.
    #[must_use]
    pub fn count(&self) -> usize {
        self.connections.len()
    }

    /// Unicast a message to one client (used for the initial full sync).
    pub fn send_to(&self, client_id: &ClientId, message: &WireMessage) -> Result<(), PanelError> {
        let Some(text) = encode(message) else {
            return Ok(());
        };
        let conn = self
            .connections
            .get(client_id)
            .ok_or_else(|| PanelError::DeliveryFailure {
                client_id: client_id.clone(),
            })?;
        if conn.send(text) {
            Ok(())
        } else {
            Err(PanelError::DeliveryFailure {
                client_id: client_id.clone(),
            })
        }
    }

    /// Deliver to every connected client except `exclude`.
    ///
    /// Returns the number of clients the message was enqueued for.
    pub fn broadcast_except(&self, exclude: Option<&ClientId>, message: &WireMessage) -> usize {
        let Some(text) = encode(message) else {
            return 0;
        };
        let mut delivered = 0;
        for conn in self.connections.values() {
            if Some(&conn.id) == exclude {
                continue;
            }
            if conn.send(text.clone()) {
                delivered += 1;
            } else {
                warn!(client_id = %conn.id, "failed to deliver message to client");
            }
        }
        debug!(?exclude, delivered, "broadcast");
        delivered
    }

    /// Deliver to every connected client (server-initiated pushes).
    pub fn broadcast_all(&self, message: &WireMessage) -> usize {
        self.broadcast_except(None, message)
    }
}

fn encode(message: &WireMessage) -> Option<Arc<String>> {
    match serde_json::to_string(message) {
        Ok(json) => Some(Arc::new(json)),
        Err(e) => {
            warn!(error = %e, "failed to serialize outbound message");
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn make_connection(id: &str) -> (Arc<ClientConnection>, mpsc::Receiver<Arc<String>>) {
        let (tx, rx) = mpsc::channel(32);
        (
            Arc::new(ClientConnection::new(ClientId::from(id), tx)),
            rx,
        )
    }

    fn title() -> WireMessage {
        WireMessage::title("Panel")
    }

    #[test]
    fn add_and_remove() {
        let mut reg = ClientRegistry::new();
        let (c1, _rx) = make_connection("c1");
        reg.add(c1);
        assert_eq!(reg.count(), 1);
        assert!(reg.remove(&ClientId::from("c1")).is_some());
        assert_eq!(reg.count(), 0);
        assert!(reg.remove(&ClientId::from("c1")).is_none());
    }

    #[test]
    fn add_overwrites_same_id() {
        let mut reg = ClientRegistry::new();
        let (c1, _rx1) = make_connection("same");
        let (c2, _rx2) = make_connection("same");
        reg.add(c1);
        reg.add(c2);
        assert_eq!(reg.count(), 1);
    }

    #[tokio::test]
    async fn send_to_delivers_only_to_target() {
        let mut reg = ClientRegistry::new();
        let (c1, mut rx1) = make_connection("c1");
        let (c2, mut rx2) = make_connection("c2");
        reg.add(c1);
        reg.add(c2);

        reg.send_to(&ClientId::from("c1"), &title()).unwrap();
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_to_unknown_client_fails() {
        let reg = ClientRegistry::new();
        let err = reg.send_to(&ClientId::from("ghost"), &title()).unwrap_err();
        assert!(matches!(err, PanelError::DeliveryFailure { .. }));
    }

    #[tokio::test]
    async fn send_to_closed_channel_fails() {
        let mut reg = ClientRegistry::new();
        let (tx, rx) = mpsc::channel(32);
        reg.add(Arc::new(ClientConnection::new(ClientId::from("c1"), tx)));
        drop(rx);
        let err = reg.send_to(&ClientId::from("c1"), &title()).unwrap_err();
        assert!(matches!(err, PanelError::DeliveryFailure { .. }));
    }

    #[tokio::test]
    async fn broadcast_except_skips_originator() {
        let mut reg = ClientRegistry::new();
        let (a, mut rx_a) = make_connection("a");
        let (b, mut rx_b) = make_connection("b");
        let (c, mut rx_c) = make_connection("c");
        reg.add(a);
        reg.add(b);
        reg.add(c);

        let exclude = ClientId::from("a");
        let delivered = reg.broadcast_except(Some(&exclude), &title());
        assert_eq!(delivered, 2);
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_ok());
        assert!(rx_c.try_recv().is_ok());
    }

    #[tokio::test]
    async fn broadcast_all_reaches_everyone() {
        let mut reg = ClientRegistry::new();
        let (a, mut rx_a) = make_connection("a");
        let (b, mut rx_b) = make_connection("b");
        reg.add(a);
        reg.add(b);

        let delivered = reg.broadcast_all(&title());
        assert_eq!(delivered, 2);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn one_dead_client_does_not_abort_broadcast() {
        let mut reg = ClientRegistry::new();
        let (dead_tx, dead_rx) = mpsc::channel(32);
        reg.add(Arc::new(ClientConnection::new(
            ClientId::from("dead"),
            dead_tx,
        )));
        drop(dead_rx);
        let (alive, mut rx_alive) = make_connection("alive");
        reg.add(alive);

        let delivered = reg.broadcast_all(&title());
        assert_eq!(delivered, 1);
        assert!(rx_alive.try_recv().is_ok());
    }

    #[tokio::test]
    async fn broadcast_to_empty_registry() {
        let reg = ClientRegistry::new();
        assert_eq!(reg.broadcast_all(&title()), 0);
    }

    #[tokio::test]
    async fn broadcast_payload_is_valid_json() {
        let mut reg = ClientRegistry::new();
        let (c1, mut rx) = make_connection("c1");
        reg.add(c1);

        let _ = reg.broadcast_all(&WireMessage::title("Greenhouse"));
        let msg = rx.recv().await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(parsed["type"], "title");
        assert_eq!(parsed["label"], "Greenhouse");
    }

    #[tokio::test]
    async fn exclusion_with_no_match_reaches_everyone() {
        let mut reg = ClientRegistry::new();
        let (a, mut rx_a) = make_connection("a");
        reg.add(a);
        let ghost = ClientId::from("ghost");
        let delivered = reg.broadcast_except(Some(&ghost), &title());
        assert_eq!(delivered, 1);
        assert!(rx_a.try_recv().is_ok());
    }
}
