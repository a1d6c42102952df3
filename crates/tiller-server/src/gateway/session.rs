//! Per-client WebSocket session loop — from upgrade through disconnect.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use tiller_core::ClientId;

use crate::gateway::connection::ClientConnection;
use crate::router::Notification;
use crate::server::AppState;

/// Run a WebSocket session for one connected client.
///
/// 1. Registers the connection with the dispatch router (which unicasts the
///    full panel sync)
/// 2. Forwards inbound text frames to the router as `Message` notifications
/// 3. Drains the connection's outbound queue into the socket, interleaving
///    periodic Ping frames; a client silent past the pong timeout is dropped
/// 4. Deregisters on close or socket error
#[instrument(skip_all, fields(client_id = %client_id))]
pub async fn run_ws_session(ws: WebSocket, client_id: ClientId, state: AppState) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    let (send_tx, mut send_rx) =
        mpsc::channel::<Arc<String>>(state.config.client_queue_capacity);
    let connection = Arc::new(ClientConnection::new(client_id.clone(), send_tx));

    let _ = state.active_clients.fetch_add(1, Ordering::Relaxed);
    info!("client connected");

    if state
        .notify
        .send(Notification::Connect(connection.clone()))
        .await
        .is_err()
    {
        warn!("dispatch router unavailable, closing session");
        let _ = state.active_clients.fetch_sub(1, Ordering::Relaxed);
        return;
    }

    let ping_interval = Duration::from_secs(state.config.heartbeat_interval_secs);
    let pong_timeout = Duration::from_secs(state.config.heartbeat_timeout_secs);

    // Outbound forwarder with periodic Ping frames.
    let outbound_conn = connection.clone();
    let outbound = tokio::spawn(async move {
        let mut ping = tokio::time::interval(ping_interval);
        // Skip the immediate first tick
        let _ = ping.tick().await;

        loop {
            tokio::select! {
                msg = send_rx.recv() => {
                    match msg {
                        Some(text) => {
                            if ws_tx.send(Message::Text(text.to_string().into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping.tick() => {
                    if !outbound_conn.check_alive()
                        && outbound_conn.last_pong_elapsed() > pong_timeout
                    {
                        warn!("client unresponsive for {pong_timeout:?}, disconnecting");
                        break;
                    }
                    if ws_tx.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Process incoming frames.
    while let Some(Ok(frame)) = ws_rx.next().await {
        let text = match frame {
            Message::Text(ref t) => Some(t.to_string()),
            Message::Binary(ref data) => match std::str::from_utf8(data) {
                Ok(s) => Some(s.to_owned()),
                Err(_) => {
                    debug!(len = data.len(), "ignoring non-UTF8 binary frame");
                    None
                }
            },
            Message::Close(_) => {
                debug!("client sent close frame");
                break;
            }
            Message::Ping(_) | Message::Pong(_) => {
                connection.mark_alive();
                None
            }
        };

        let Some(text) = text else { continue };
        connection.mark_alive();

        if state
            .notify
            .send(Notification::Message(client_id.clone(), text))
            .await
            .is_err()
        {
            break;
        }
    }

    // Clean up
    info!(dropped = connection.drop_count(), "client disconnected");
    outbound.abort();
    let _ = state
        .notify
        .send(Notification::Disconnect(client_id))
        .await;
    let _ = state.active_clients.fetch_sub(1, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    // Session loops need a live WebSocket on both ends; the end-to-end flow
    // is covered by tests/integration.rs. Unit coverage for the pieces lives
    // with ClientConnection and the dispatch router.
}
