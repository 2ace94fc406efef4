//! Sequential fetch/render/compile pipeline.
//!
//! One timestamp at a time, in window order; frames accumulate in memory
//! and are compiled once the window is exhausted. Any stage error aborts
//! the run: no skip-and-continue, no partial output.

use tracing::info;

use archive_client::{GoesArchive, NexradArchive};
use renderer::gif::save_gif;
use renderer::{render_scene, render_volume};
use wx_common::WxResult;

use crate::config::{RadarFrameConfig, SatelliteFrameConfig, SatelliteLoopConfig};

/// Fetch the scan nearest the requested time and write a single PNG.
pub async fn run_satellite_frame(
    archive: &GoesArchive,
    cfg: &SatelliteFrameConfig,
) -> WxResult<()> {
    let scene = archive.fetch_nearest(cfg.at).await?;
    let frame = render_scene(&scene, &cfg.style)?;
    frame.save_png(&cfg.output)?;

    info!(output = %cfg.output.display(), "Wrote satellite frame");
    Ok(())
}

/// Fetch one scan per window timestamp and compile the frames into a
/// looping GIF.
pub async fn run_satellite_loop(
    archive: &GoesArchive,
    cfg: &SatelliteLoopConfig,
) -> WxResult<()> {
    let mut frames = Vec::with_capacity(cfg.window.frame_count());
    for at in cfg.window.iter() {
        let scene = archive.fetch_nearest(at).await?;
        frames.push(render_scene(&scene, &cfg.style)?);
        info!(at = %at.format("%Y-%m-%dT%H:%MZ"), frame = frames.len(), "Rendered loop frame");
    }

    save_gif(&frames, cfg.frame_delay_ms, &cfg.output)?;
    info!(
        frames = frames.len(),
        output = %cfg.output.display(),
        "Wrote satellite loop"
    );
    Ok(())
}

/// Fetch the volume scan nearest the requested time and write a single PNG.
pub async fn run_radar_frame(archive: &NexradArchive, cfg: &RadarFrameConfig) -> WxResult<()> {
    let volume = archive.fetch_nearest(cfg.at).await?;
    let frame = render_volume(&volume, &cfg.style)?;
    frame.save_png(&cfg.output)?;

    info!(output = %cfg.output.display(), "Wrote radar frame");
    Ok(())
}
