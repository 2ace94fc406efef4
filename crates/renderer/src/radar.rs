//! Radar volume rendering.
//!
//! Projects the base reflectivity sweep onto a top-down cartesian canvas
//! centered on the radar: north up, range scaled so the furthest gate
//! touches the frame edge.

use tracing::debug;

use level2_parser::{Radial, Sweep, VolumeScan};
use wx_common::{WxError, WxResult};

use crate::annotate::draw_banner;
use crate::frame::Frame;
use crate::style::FrameStyle;

/// Render the base sweep of one volume scan into a frame.
pub fn render_volume(volume: &VolumeScan, style: &FrameStyle) -> WxResult<Frame> {
    style.validate()?;

    let sweep = volume
        .base_sweep()
        .filter(|s| !s.radials.is_empty())
        .ok_or_else(|| WxError::Render("volume has no radials".to_string()))?;

    let max_range = sweep
        .radials
        .iter()
        .map(|r| r.first_gate_m + r.gate_spacing_m * r.gates.len() as f32)
        .fold(0.0f32, f32::max);
    if max_range <= 0.0 {
        return Err(WxError::Render("sweep has no gates".to_string()));
    }

    let lookup = AzimuthLookup::build(sweep);
    let mut frame = Frame::filled(style.width, style.height, style.background);

    let cx = style.width as f32 / 2.0;
    let cy = style.height as f32 / 2.0;
    let meters_per_pixel = max_range / cx.min(cy);

    for y in 0..style.height {
        for x in 0..style.width {
            let dx = (x as f32 + 0.5 - cx) * meters_per_pixel;
            let dy = (cy - (y as f32 + 0.5)) * meters_per_pixel; // north up

            let range = (dx * dx + dy * dy).sqrt();
            if range > max_range {
                continue;
            }

            // Degrees clockwise from north.
            let azimuth = dx.atan2(dy).to_degrees().rem_euclid(360.0);
            let Some(radial) = lookup.nearest(azimuth, sweep) else {
                continue;
            };

            let gate = (range - radial.first_gate_m) / radial.gate_spacing_m;
            if gate < 0.0 {
                continue;
            }
            let Some(Some(dbz)) = radial.gates.get(gate as usize) else {
                continue;
            };
            frame.set_pixel(x, y, style.colormap.sample(*dbz));
        }
    }

    if style.banner {
        draw_banner(&mut frame, &banner_text(volume, style));
    }

    debug!(
        site = %volume.site,
        radials = sweep.radials.len(),
        max_range_m = max_range,
        "Rendered radar frame"
    );
    Ok(frame)
}

/// Half-degree bins mapping azimuth to radial index.
struct AzimuthLookup {
    bins: Vec<Option<usize>>,
}

impl AzimuthLookup {
    const BINS: usize = 720;

    fn build(sweep: &Sweep) -> Self {
        let mut bins = vec![None; Self::BINS];

        // Stamp each radial into its bin, then fill gaps from the nearest
        // stamped neighbor so coarse sweeps still cover the circle.
        for (i, radial) in sweep.radials.iter().enumerate() {
            let bin = (radial.azimuth_deg.rem_euclid(360.0) / 360.0 * Self::BINS as f32) as usize
                % Self::BINS;
            bins[bin] = Some(i);
        }

        let stamped: Vec<usize> = (0..Self::BINS).filter(|&b| bins[b].is_some()).collect();
        if !stamped.is_empty() {
            for b in 0..Self::BINS {
                if bins[b].is_none() {
                    let nearest = stamped
                        .iter()
                        .min_by_key(|&&s| {
                            let d = (s as isize - b as isize).unsigned_abs();
                            d.min(Self::BINS - d)
                        })
                        .copied();
                    bins[b] = nearest.and_then(|s| bins[s]);
                }
            }
        }

        Self { bins }
    }

    fn nearest<'a>(&self, azimuth_deg: f32, sweep: &'a Sweep) -> Option<&'a Radial> {
        let bin = (azimuth_deg.rem_euclid(360.0) / 360.0 * Self::BINS as f32) as usize
            % Self::BINS;
        self.bins[bin].map(|i| &sweep.radials[i])
    }
}

fn banner_text(volume: &VolumeScan, style: &FrameStyle) -> String {
    let title = style
        .title
        .clone()
        .unwrap_or_else(|| format!("{} REFLECTIVITY", volume.site));
    format!(
        "{} {}",
        title,
        volume.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    )
}
