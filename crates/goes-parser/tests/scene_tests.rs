//! Tests for ABI scene decoding against synthetic NetCDF files.

use chrono::{TimeZone, Utc};
use goes_parser::{GoesError, SatelliteScene, SceneData};
use test_utils::goes::{cmip_scene, mcmip_scene, SceneSpec};

#[test]
fn test_decode_single_band_scene() {
    let at = Utc.with_ymd_and_hms(2019, 9, 1, 0, 1, 16).unwrap();
    let spec = SceneSpec::gradient("G16", at, 8, 4);
    let bytes = cmip_scene(&spec);

    let scene = SatelliteScene::decode(&bytes).unwrap();
    assert_eq!(scene.platform, "G16");
    assert_eq!(scene.timestamp, at);

    let SceneData::Single(grid) = &scene.data else {
        panic!("expected single-band scene");
    };
    assert_eq!(grid.width, 8);
    assert_eq!(grid.height, 4);
    // Gradient goes left to right: 0, 1/8, 2/8, ...
    assert!((grid.get(0, 0) - 0.0).abs() < 1e-3);
    assert!((grid.get(4, 2) - 0.5).abs() < 1e-3);
}

#[test]
fn test_fill_values_become_nan() {
    let at = Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap();
    let mut spec = SceneSpec::gradient("G16", at, 4, 4);
    spec.values[5] = f32::NAN;
    let bytes = cmip_scene(&spec);

    let scene = SatelliteScene::decode(&bytes).unwrap();
    let SceneData::Single(grid) = &scene.data else {
        panic!("expected single-band scene");
    };
    assert!(grid.values[5].is_nan());
    assert!(!grid.values[4].is_nan());
}

#[test]
fn test_decode_multi_band_scene() {
    let at = Utc.with_ymd_and_hms(2019, 9, 1, 6, 0, 0).unwrap();
    let spec = SceneSpec::gradient("G16", at, 4, 4);
    let red = vec![0.8; 16];
    let veggie = vec![0.4; 16];
    let blue = vec![0.2; 16];
    let bytes = mcmip_scene(&spec, &red, &veggie, &blue);

    let scene = SatelliteScene::decode(&bytes).unwrap();
    let SceneData::MultiBand { red, veggie, blue } = &scene.data else {
        panic!("expected multi-band scene");
    };
    assert!((red.get(1, 1) - 0.8).abs() < 1e-3);
    assert!((veggie.get(1, 1) - 0.4).abs() < 1e-3);
    assert!((blue.get(1, 1) - 0.2).abs() < 1e-3);
}

#[test]
fn test_scan_angle_linearization() {
    let at = Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap();
    let spec = SceneSpec::gradient("G16", at, 8, 4);
    let scene = SatelliteScene::decode(&cmip_scene(&spec)).unwrap();

    assert!((scene.x_rad(0) - spec.x_offset).abs() < 1e-12);
    assert!((scene.x_rad(3) - (spec.x_offset + 3.0 * spec.x_scale)).abs() < 1e-12);

    // Index recovery round trips.
    assert_eq!(scene.col_for_x(scene.x_rad(5)), Some(5));
    assert_eq!(scene.row_for_y(scene.y_rad(2)), Some(2));
    assert_eq!(scene.col_for_x(spec.x_offset + 100.0 * spec.x_scale), None);
}

#[test]
fn test_rejects_non_netcdf_bytes() {
    let err = SatelliteScene::decode(b"PNG not NetCDF").unwrap_err();
    assert!(matches!(err, GoesError::InvalidFormat(_)));
}

#[test]
fn test_rejects_truncated_container() {
    let at = Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap();
    let spec = SceneSpec::gradient("G16", at, 8, 8);
    let mut bytes = cmip_scene(&spec);
    bytes.truncate(bytes.len() / 2);
    assert!(SatelliteScene::decode(&bytes).is_err());
}
