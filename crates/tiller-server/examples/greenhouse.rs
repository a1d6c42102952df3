//! A small greenhouse panel.
//!
//! Run with `cargo run --example greenhouse`, then point a panel client at
//! `ws://127.0.0.1:3000/ws`. Static assets, if provisioned under `assets/`,
//! are served from the same port.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tiller_core::ControlPanel;
use tiller_server::{PanelServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tiller_server::logging::init();

    let mut panel = ControlPanel::new("Greenhouse");
    let _ = panel.label("Temperature", "slate", Some("21 C"))?;
    let _ = panel.switch(
        "Pump",
        "emerald",
        false,
        Arc::new(|control, event| {
            info!(%event, state = %control.value, "pump toggled");
        }),
    )?;
    let _ = panel.slider(
        "Fan speed",
        "amber",
        30,
        Arc::new(|control, _event| {
            info!(value = %control.value, "fan speed changed");
        }),
    )?;
    let _ = panel.button(
        "Water now",
        "blue",
        None,
        Arc::new(|_control, event| {
            info!(%event, "watering");
        }),
    )?;
    let _ = panel.pad(
        "Camera",
        "violet",
        true,
        Arc::new(|_control, event| {
            info!(%event, "camera moved");
        }),
    )?;

    let mut config = ServerConfig::load();
    if config.port == 0 {
        config.port = 3000;
    }
    let running = PanelServer::new(config, panel).listen().await?;
    info!(addr = %running.addr(), "panel ready");

    // Fake a sensor feed: every connected client sees the label change.
    let handle = running.handle();
    let sensor = tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(10));
        let mut n: i64 = 0;
        loop {
            let _ = tick.tick().await;
            n += 1;
            let reading = format!("{} C", 20 + (n % 4));
            if handle.set_text("Temperature", reading).await.is_err() {
                break;
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    sensor.abort();
    running.shutdown().await;
    Ok(())
}
