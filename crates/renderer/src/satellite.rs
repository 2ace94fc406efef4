//! Satellite scene rendering.

use tracing::debug;

use goes_parser::{Grid, SatelliteScene, SceneData};
use wx_common::{WxError, WxResult};

use crate::annotate::draw_banner;
use crate::colormap::Color;
use crate::frame::Frame;
use crate::style::FrameStyle;

/// Render one ABI scene into a frame.
///
/// With a geographic extent in the style, each output pixel is mapped
/// lat/lon -> scan angle -> nearest grid cell; without one, the raw scan
/// grid is resampled to the output size. Deterministic for identical
/// inputs.
pub fn render_scene(scene: &SatelliteScene, style: &FrameStyle) -> WxResult<Frame> {
    style.validate()?;

    let width = scene.data.width();
    let height = scene.data.height();
    if width == 0 || height == 0 {
        return Err(WxError::Render("scene grid has zero dimension".to_string()));
    }

    let mut frame = Frame::filled(style.width, style.height, style.background);

    match style.extent {
        Some(extent) => render_projected(scene, style, extent, &mut frame),
        None => render_raw(scene, style, &mut frame),
    }

    if style.banner {
        draw_banner(&mut frame, &banner_text(scene, style));
    }

    debug!(
        platform = %scene.platform,
        width = style.width,
        height = style.height,
        "Rendered satellite frame"
    );
    Ok(frame)
}

/// Nearest-neighbor resample of the raw scan grid.
fn render_raw(scene: &SatelliteScene, style: &FrameStyle, frame: &mut Frame) {
    let src_w = scene.data.width();
    let src_h = scene.data.height();

    for y in 0..style.height {
        let sy = y * src_h / style.height;
        for x in 0..style.width {
            let sx = x * src_w / style.width;
            if let Some(color) = sample_color(scene, style, sx, sy) {
                frame.set_pixel(x, y, color);
            }
        }
    }
}

/// Plate-carrée render over a geographic extent.
fn render_projected(
    scene: &SatelliteScene,
    style: &FrameStyle,
    extent: crate::style::Extent,
    frame: &mut Frame,
) {
    let lon_span = extent.max_lon - extent.min_lon;
    let lat_span = extent.max_lat - extent.min_lat;

    for y in 0..style.height {
        // Row 0 is the northern edge.
        let lat = extent.max_lat - (y as f64 + 0.5) / style.height as f64 * lat_span;
        for x in 0..style.width {
            let lon = extent.min_lon + (x as f64 + 0.5) / style.width as f64 * lon_span;

            let Some((sx_rad, sy_rad)) = scene.projection.from_geographic(lat, lon) else {
                continue; // Not visible from the satellite.
            };
            let (Some(col), Some(row)) = (scene.col_for_x(sx_rad), scene.row_for_y(sy_rad))
            else {
                continue; // Outside the scanned sector.
            };
            if let Some(color) = sample_color(scene, style, col, row) {
                frame.set_pixel(x, y, color);
            }
        }
    }
}

/// Color of one source grid cell, None for fill values.
fn sample_color(
    scene: &SatelliteScene,
    style: &FrameStyle,
    x: usize,
    y: usize,
) -> Option<Color> {
    match &scene.data {
        SceneData::Single(grid) => {
            let v = grid.get(x, y);
            if v.is_nan() {
                return None;
            }
            Some(style.colormap.sample(v))
        }
        SceneData::MultiBand { red, veggie, blue } => true_color(red, veggie, blue, x, y),
    }
}

/// True-color composite with the standard synthetic green blend.
fn true_color(red: &Grid, veggie: &Grid, blue: &Grid, x: usize, y: usize) -> Option<Color> {
    let r = red.get(x, y);
    let g_veggie = veggie.get(x, y);
    let b = blue.get(x, y);
    if r.is_nan() || g_veggie.is_nan() || b.is_nan() {
        return None;
    }
    // Synthetic green: 0.45 R + 0.10 veggie + 0.45 B.
    let g = 0.45 * r + 0.10 * g_veggie + 0.45 * b;

    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Some(Color {
        r: to_byte(r),
        g: to_byte(g),
        b: to_byte(b),
        a: 255,
    })
}

fn banner_text(scene: &SatelliteScene, style: &FrameStyle) -> String {
    let title = style
        .title
        .clone()
        .unwrap_or_else(|| scene.platform.clone());
    format!(
        "{} {}",
        title,
        scene.timestamp.format("%Y-%m-%d %H:%M UTC")
    )
}
