//! Entry point: loads configuration, wires the storage/extraction/
//! embedding/pipeline stack for the configured root, and blocks until
//! interrupted. No HTTP/WebSocket server lives here — an external process
//! drives `sefs_api::ControlPlane` over whatever transport it chooses.

mod daemon;

use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let control_plane = daemon::start(config_path.as_deref()).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal");
    drop(control_plane);
    Ok(())
}
