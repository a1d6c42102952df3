//! # tiller-server
//!
//! Axum HTTP + `WebSocket` server for a Tiller control panel.
//!
//! - HTTP endpoints: health check, static asset fallback
//! - `WebSocket` gateway: per-client connection lifecycle and ping/pong
//!   liveness
//! - Dispatch router: one task owning the panel, processing gateway
//!   notifications and server commands strictly one at a time
//! - Client registry: unicast full sync on connect, broadcast with
//!   per-message originator exclusion
//! - Graceful shutdown via `CancellationToken`

#![deny(unsafe_code)]

pub mod clients;
pub mod config;
pub mod gateway;
pub mod handle;
pub mod health;
pub mod logging;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use handle::PanelHandle;
pub use router::Target;
pub use server::{PanelServer, RunningPanel};
