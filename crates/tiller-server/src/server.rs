//! `PanelServer` — axum HTTP + WebSocket server wiring.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use tiller_core::{ClientId, ControlPanel};

use crate::config::ServerConfig;
use crate::gateway::session::run_ws_session;
use crate::handle::PanelHandle;
use crate::health::{self, HealthResponse};
use crate::router::{DispatchRouter, Notification};

/// Shared state accessible from axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Sender half of the dispatch router inbox.
    pub notify: mpsc::Sender<Notification>,
    /// Live WebSocket client count.
    pub active_clients: Arc<AtomicUsize>,
    /// When the server started.
    pub start_time: Instant,
    /// Controls registered at startup. The registry is insert-only and is
    /// sealed once the server takes ownership of it.
    pub control_count: usize,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

/// Build the axum router: health check, WebSocket upgrade, and the static
/// asset fallback.
///
/// The asset directory is served independently of the panel protocol; if it
/// is absent every asset request simply 404s while `/ws` and `/health` keep
/// working.
pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.assets_dir);
    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .fallback_service(assets)
        .with_state(state)
}

/// The panel server. Owns the control panel until [`Self::listen`] hands it
/// to the dispatch router task.
pub struct PanelServer {
    config: ServerConfig,
    panel: ControlPanel,
}

impl PanelServer {
    /// Create a server for a fully-populated panel.
    ///
    /// Controls are registered before serving; the panel moves into the
    /// dispatch router on `listen` and is mutated only through client events
    /// and [`PanelHandle`] commands from then on.
    #[must_use]
    pub fn new(config: ServerConfig, panel: ControlPanel) -> Self {
        Self { config, panel }
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The panel as registered so far.
    #[must_use]
    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// Bind the listener, spawn the dispatch router and HTTP tasks, and
    /// return the running server.
    pub async fn listen(self) -> std::io::Result<RunningPanel> {
        let (notify, inbox) = mpsc::channel(self.config.inbox_capacity);
        let cancel = CancellationToken::new();
        let control_count = self.panel.count();

        let router_task = {
            let cancel = cancel.clone();
            let dispatcher = DispatchRouter::new(self.panel, inbox);
            tokio::spawn(dispatcher.run(cancel))
        };

        let state = AppState {
            notify: notify.clone(),
            active_clients: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
            control_count,
            config: Arc::new(self.config),
        };
        let app = build_router(state.clone());

        let listener =
            TcpListener::bind((state.config.host.as_str(), state.config.port)).await?;
        let addr = listener.local_addr()?;
        info!(%addr, controls = control_count, "panel server listening");

        let http_task = {
            let shutdown = cancel.clone().cancelled_owned();
            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown)
                    .await
                {
                    error!(error = %e, "http server error");
                }
            })
        };

        Ok(RunningPanel {
            addr,
            handle: PanelHandle::new(notify),
            cancel,
            router_task,
            http_task,
        })
    }
}

/// A started panel server and its background tasks.
pub struct RunningPanel {
    addr: SocketAddr,
    handle: PanelHandle,
    cancel: CancellationToken,
    router_task: JoinHandle<()>,
    http_task: JoinHandle<()>,
}

impl RunningPanel {
    /// The bound socket address.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// A handle for server-initiated panel updates.
    #[must_use]
    pub fn handle(&self) -> PanelHandle {
        self.handle.clone()
    }

    /// Signal shutdown and wait for the background tasks to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.router_task.await;
        let _ = self.http_task.await;
        info!("panel server stopped");
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let clients = state.active_clients.load(Ordering::Relaxed);
    Json(health::health_check(
        state.start_time,
        clients,
        state.control_count,
    ))
}

/// GET /ws — WebSocket upgrade.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let active = state.active_clients.load(Ordering::Relaxed);
    if active >= state.config.max_clients {
        warn!(active, max = state.config.max_clients, "rejecting client, at capacity");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    let client_id = ClientId::new();
    ws.max_message_size(state.config.max_message_size)
        .on_upgrade(move |socket| run_ws_session(socket, client_id, state))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
