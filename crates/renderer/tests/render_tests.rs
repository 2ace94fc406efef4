//! Tests for satellite and radar frame rendering.

use chrono::{TimeZone, Utc};
use level2_parser::decode_volume;
use renderer::colormap::Color;
use renderer::{render_scene, render_volume, Extent, FrameStyle};
use test_utils::goes::{cmip_scene, mcmip_scene, SceneSpec};
use test_utils::level2::{current_volume, RadialSpec};

fn sample_scene() -> goes_parser::SatelliteScene {
    let at = Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap();
    let spec = SceneSpec::gradient("G16", at, 16, 8);
    goes_parser::SatelliteScene::decode(&cmip_scene(&spec)).unwrap()
}

fn sample_volume() -> level2_parser::VolumeScan {
    let at = Utc.with_ymd_and_hms(2025, 6, 19, 22, 7, 53).unwrap();
    let radials: Vec<RadialSpec> = (0..360)
        .map(|az| RadialSpec::uniform(az as f32, 30.0, 100))
        .collect();
    decode_volume(&current_volume("KMOB", at, &radials)).unwrap()
}

// ============================================================================
// Satellite rendering
// ============================================================================

#[test]
fn test_render_scene_raw_grid() {
    let scene = sample_scene();
    let style = FrameStyle::satellite(64, 32);

    let frame = render_scene(&scene, &style).unwrap();
    assert_eq!(frame.width, 64);
    assert_eq!(frame.height, 32);

    // Gradient: left edge darker than right edge (above the banner strip).
    let left = frame.get_pixel(1, 4);
    let right = frame.get_pixel(62, 4);
    assert!(left.r < right.r);
}

#[test]
fn test_render_scene_is_idempotent() {
    let scene = sample_scene();
    let style = FrameStyle::satellite(64, 32);

    let a = render_scene(&scene, &style).unwrap().encode_png().unwrap();
    let b = render_scene(&scene, &style).unwrap().encode_png().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_render_scene_projected_extent() {
    let scene = sample_scene();

    // Build an extent around the geographic location of the grid center so
    // the reprojection actually samples the scene.
    let (lat, lon) = scene
        .projection
        .to_geographic(scene.x_rad(8), scene.y_rad(4))
        .unwrap();
    let mut style = FrameStyle::satellite(32, 32);
    style.extent = Some(Extent::new(lon - 0.05, lon + 0.05, lat - 0.05, lat + 0.05));
    style.banner = false;

    let frame = render_scene(&scene, &style).unwrap();
    let background = style.background;
    assert!(
        (0..32).any(|y| (0..32).any(|x| frame.get_pixel(x, y) != background)),
        "projected render never sampled the scene"
    );
}

#[test]
fn test_render_multiband_true_color() {
    let at = Utc.with_ymd_and_hms(2019, 9, 1, 6, 0, 0).unwrap();
    let spec = SceneSpec::gradient("G16", at, 8, 8);
    let red = vec![0.8; 64];
    let veggie = vec![0.4; 64];
    let blue = vec![0.2; 64];
    let scene =
        goes_parser::SatelliteScene::decode(&mcmip_scene(&spec, &red, &veggie, &blue)).unwrap();

    let mut style = FrameStyle::satellite(16, 16);
    style.banner = false;
    let frame = render_scene(&scene, &style).unwrap();

    let px = frame.get_pixel(8, 8);
    assert_eq!(px.r, 204); // 0.8
    assert_eq!(px.b, 51); // 0.2
    // Synthetic green: 0.45*0.8 + 0.10*0.4 + 0.45*0.2 = 0.49
    assert_eq!(px.g, 125);
}

#[test]
fn test_render_scene_banner_row() {
    let scene = sample_scene();
    let style = FrameStyle::satellite(64, 32);
    let frame = render_scene(&scene, &style).unwrap();
    assert_eq!(frame.get_pixel(0, 31), Color::rgb(10, 10, 10));
}

// ============================================================================
// Radar rendering
// ============================================================================

#[test]
fn test_render_volume_paints_reflectivity() {
    let volume = sample_volume();
    let mut style = FrameStyle::radar(64, 64);
    style.banner = false;

    let frame = render_volume(&volume, &style).unwrap();

    // A uniform 30 dBZ field maps to the 30 dBZ stop color away from the
    // center (inside the first gate the field is empty).
    let px = frame.get_pixel(32, 10);
    assert_eq!((px.r, px.g, px.b), (0, 142, 0));

    // Corners are beyond the maximum range, so they keep the background.
    assert_eq!(frame.get_pixel(0, 0), style.background);
}

#[test]
fn test_render_volume_is_idempotent() {
    let volume = sample_volume();
    let style = FrameStyle::radar(64, 64);

    let a = render_volume(&volume, &style).unwrap().encode_png().unwrap();
    let b = render_volume(&volume, &style).unwrap().encode_png().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_render_volume_without_radials_fails() {
    let volume = level2_parser::VolumeScan {
        site: "KTLX".to_string(),
        timestamp: Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap(),
        format: wx_common::VolumeFormat::Current,
        sweeps: vec![],
    };
    let err = render_volume(&volume, &FrameStyle::radar(32, 32)).unwrap_err();
    assert!(matches!(err, wx_common::WxError::Render(_)));
}

#[test]
fn test_render_rejects_zero_dimensions() {
    let scene = sample_scene();
    let style = FrameStyle::satellite(0, 32);
    assert!(render_scene(&scene, &style).is_err());
}
