//! Air Drum Kit - Main Entry Point

use anyhow::{anyhow, Context};
use drumkit::{init_logging, run_session, KitConfig, Recording};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = KitConfig::load()?;
    init_logging(config.level()?);

    info!("=== Air Drum Kit v{} ===", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let path = config
        .replay
        .path
        .clone()
        .ok_or_else(|| anyhow!("no pose recording configured (set replay.path or DRUMKIT__REPLAY__PATH)"))?;
    let recording = Recording::load(&path)
        .with_context(|| format!("loading recording {}", path.display()))?;

    run_session(&config, recording).await?;

    Ok(())
}
