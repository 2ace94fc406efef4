//! Value-to-color mapping.

use serde::{Deserialize, Serialize};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
}

/// One stop of a gradient colormap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColorStop {
    pub value: f32,
    pub color: Color,
}

/// A piecewise-linear gradient over sorted color stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colormap {
    stops: Vec<ColorStop>,
}

impl Colormap {
    /// Build from stops; they are sorted by value on construction.
    pub fn new(mut stops: Vec<ColorStop>) -> Self {
        stops.sort_by(|a, b| a.value.total_cmp(&b.value));
        Self { stops }
    }

    /// Sample the gradient at `value`, clamping outside the stop range.
    pub fn sample(&self, value: f32) -> Color {
        if self.stops.is_empty() || value.is_nan() {
            return Color::TRANSPARENT;
        }
        if value <= self.stops[0].value {
            return self.stops[0].color;
        }
        if let Some(last) = self.stops.last() {
            if value >= last.value {
                return last.color;
            }
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if value >= lo.value && value <= hi.value {
                let t = (value - lo.value) / (hi.value - lo.value);
                return interpolate_color(lo.color, hi.color, t);
            }
        }

        Color::TRANSPARENT
    }

    /// NWS-style base reflectivity ramp over -20..70 dBZ.
    pub fn nws_reflectivity() -> Self {
        Self::new(vec![
            stop(-20.0, 0, 0, 0),
            stop(5.0, 4, 233, 231),
            stop(10.0, 1, 159, 244),
            stop(15.0, 3, 0, 244),
            stop(20.0, 2, 253, 2),
            stop(25.0, 1, 197, 1),
            stop(30.0, 0, 142, 0),
            stop(35.0, 253, 248, 2),
            stop(40.0, 229, 188, 0),
            stop(45.0, 253, 149, 0),
            stop(50.0, 253, 0, 0),
            stop(55.0, 212, 0, 0),
            stop(60.0, 188, 0, 0),
            stop(65.0, 248, 0, 253),
            stop(70.0, 152, 84, 198),
        ])
    }

    /// Grayscale ramp for single-band reflectance or brightness.
    pub fn grayscale(min: f32, max: f32) -> Self {
        Self::new(vec![
            stop(min, 0, 0, 0),
            stop(max, 255, 255, 255),
        ])
    }
}

fn stop(value: f32, r: u8, g: u8, b: u8) -> ColorStop {
    ColorStop {
        value,
        color: Color::rgb(r, g, b),
    }
}

/// Linearly interpolate two colors.
pub fn interpolate_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color {
        r: lerp(a.r, b.r),
        g: lerp(a.g, b.g),
        b: lerp(a.b, b.b),
        a: lerp(a.a, b.a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_clamps_at_ends() {
        let map = Colormap::grayscale(0.0, 1.0);
        assert_eq!(map.sample(-5.0), Color::rgb(0, 0, 0));
        assert_eq!(map.sample(5.0), Color::rgb(255, 255, 255));
    }

    #[test]
    fn test_sample_interpolates_midpoint() {
        let map = Colormap::grayscale(0.0, 1.0);
        let mid = map.sample(0.5);
        assert!((mid.r as i32 - 128).abs() <= 1);
        assert_eq!(mid.r, mid.g);
        assert_eq!(mid.g, mid.b);
    }

    #[test]
    fn test_nan_is_transparent() {
        let map = Colormap::nws_reflectivity();
        assert_eq!(map.sample(f32::NAN), Color::TRANSPARENT);
    }

    #[test]
    fn test_stops_sorted_on_construction() {
        let map = Colormap::new(vec![
            stop(1.0, 255, 255, 255),
            stop(0.0, 0, 0, 0),
        ]);
        assert_eq!(map.sample(-1.0), Color::rgb(0, 0, 0));
    }
}
