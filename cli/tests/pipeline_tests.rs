//! End-to-end pipeline tests against an in-memory object store.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::ObjectStore;

use archive_client::{GoesArchive, NexradArchive};
use renderer::FrameStyle;
use test_utils::goes::{cmip_scene, SceneSpec};
use test_utils::level2::{current_volume, RadialSpec};
use wx_common::{
    Channel, RadarSelector, Satellite, SatelliteSelector, Sector, TimeWindow, WxError,
};
use wxloop::config::{RadarFrameConfig, SatelliteFrameConfig, SatelliteLoopConfig};
use wxloop::pipeline::{run_radar_frame, run_satellite_frame, run_satellite_loop};

fn selector() -> SatelliteSelector {
    SatelliteSelector::new(Satellite::Goes16, Sector::Conus, Channel::Band(2)).unwrap()
}

/// Seed one scene with a uniform brightness under the archive key layout.
async fn seed_uniform_scene(store: &Arc<dyn ObjectStore>, scan_start: DateTime<Utc>, value: f32) {
    let stamp = scan_start.format("%Y%j%H%M%S");
    let key = format!(
        "{}/OR_ABI-L2-CMIPC-M6C02_G16_s{stamp}0_e{stamp}0_c{stamp}0.nc",
        selector().key_prefix(scan_start)
    );
    let mut spec = SceneSpec::gradient("G16", scan_start, 8, 8);
    spec.values = vec![value; 64];
    store
        .put(&Path::from(key), cmip_scene(&spec).into())
        .await
        .unwrap();
}

fn plain_style(width: usize, height: usize) -> FrameStyle {
    let mut style = FrameStyle::satellite(width, height);
    style.banner = false;
    style
}

#[tokio::test]
async fn test_hourly_loop_compiles_frames_in_window_order() {
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());

    // Seven hourly scans, each a bit past the hour, with increasing
    // brightness so frame order is observable in the output.
    for hour in 0..7u32 {
        let scan = Utc.with_ymd_and_hms(2019, 9, 1, hour, 1, 0).unwrap();
        seed_uniform_scene(&store, scan, hour as f32 / 10.0).await;
    }

    let window = TimeWindow::new(
        Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2019, 9, 1, 6, 0, 0).unwrap(),
        chrono::Duration::hours(1),
    )
    .unwrap();
    assert_eq!(window.frame_count(), 7);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("loop.gif");
    let cfg = SatelliteLoopConfig {
        selector: selector(),
        window,
        style: plain_style(16, 16),
        frame_delay_ms: 100,
        output: output.clone(),
    };

    let archive = GoesArchive::with_store(store, selector());
    run_satellite_loop(&archive, &cfg).await.unwrap();

    let decoder = GifDecoder::new(std::fs::File::open(&output).unwrap()).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 7);

    // Grayscale colormap: brightness tracks the seeded value, so the frame
    // sequence must be strictly brighter hour over hour. GIF quantization
    // may nudge exact values, hence the tolerance.
    let brightness: Vec<u8> = frames
        .iter()
        .map(|f| f.buffer().get_pixel(8, 8)[0])
        .collect();
    for (hour, &b) in brightness.iter().enumerate() {
        let expected = (hour as f32 / 10.0 * 255.0).round();
        assert!(
            (b as f32 - expected).abs() <= 8.0,
            "frame {hour}: brightness {b}, expected near {expected}"
        );
    }
    for pair in brightness.windows(2) {
        assert!(pair[0] < pair[1], "frames out of window order");
    }
}

#[tokio::test]
async fn test_loop_aborts_on_archive_gap_without_output() {
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    // Only the first hour exists; the rest of the window is a gap.
    seed_uniform_scene(
        &store,
        Utc.with_ymd_and_hms(2019, 9, 1, 0, 1, 0).unwrap(),
        0.5,
    )
    .await;

    let window = TimeWindow::new(
        Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2019, 9, 1, 6, 0, 0).unwrap(),
        chrono::Duration::hours(1),
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("loop.gif");
    let cfg = SatelliteLoopConfig {
        selector: selector(),
        window,
        style: plain_style(16, 16),
        frame_delay_ms: 100,
        output: output.clone(),
    };

    let archive = GoesArchive::with_store(store, selector());
    let err = run_satellite_loop(&archive, &cfg).await.unwrap_err();
    assert!(matches!(err, WxError::NotFound(_)));
    assert!(!output.exists(), "aborted run must not leave partial output");
}

#[tokio::test]
async fn test_satellite_frame_writes_png() {
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    let at = Utc.with_ymd_and_hms(2019, 9, 1, 6, 0, 0).unwrap();
    seed_uniform_scene(&store, at, 0.7).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("scene.png");
    let cfg = SatelliteFrameConfig {
        selector: selector(),
        at,
        style: FrameStyle::satellite(64, 40),
        output: output.clone(),
    };

    let archive = GoesArchive::with_store(store, selector());
    run_satellite_frame(&archive, &cfg).await.unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn test_radar_frame_writes_png() {
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    let sel = RadarSelector::new("KMOB").unwrap();
    let at = Utc.with_ymd_and_hms(2025, 6, 19, 22, 7, 53).unwrap();

    let key = format!(
        "{}/KMOB{}_V06",
        sel.key_prefix(at),
        at.format("%Y%m%d_%H%M%S")
    );
    let radials: Vec<RadialSpec> = (0..36)
        .map(|i| RadialSpec::uniform(i as f32 * 10.0, 40.0, 50))
        .collect();
    store
        .put(&Path::from(key), current_volume("KMOB", at, &radials).into())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("radar.png");
    let cfg = RadarFrameConfig {
        selector: sel.clone(),
        at,
        style: FrameStyle::radar(64, 64),
        output: output.clone(),
    };

    let archive = NexradArchive::with_store(store, sel);
    run_radar_frame(&archive, &cfg).await.unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
