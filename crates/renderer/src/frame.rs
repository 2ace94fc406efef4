//! Rendered frame buffer.

use std::path::Path;

use wx_common::{WxError, WxResult};

use crate::colormap::Color;
use crate::png;

/// One rendered RGBA frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    /// RGBA pixel data, 4 bytes per pixel, row-major.
    pub pixels: Vec<u8>,
}

impl Frame {
    /// A frame filled with one color.
    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let i = (y * self.width + x) * 4;
            self.pixels[i] = color.r;
            self.pixels[i + 1] = color.g;
            self.pixels[i + 2] = color.b;
            self.pixels[i + 3] = color.a;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        let i = (y * self.width + x) * 4;
        Color {
            r: self.pixels[i],
            g: self.pixels[i + 1],
            b: self.pixels[i + 2],
            a: self.pixels[i + 3],
        }
    }

    /// Fill a rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Color) {
        for yy in y..(y + h).min(self.height) {
            for xx in x..(x + w).min(self.width) {
                self.set_pixel(xx, yy, color);
            }
        }
    }

    /// Encode as PNG, indexed when the palette fits.
    pub fn encode_png(&self) -> WxResult<Vec<u8>> {
        png::create_png_auto(&self.pixels, self.width, self.height)
            .map_err(WxError::Render)
    }

    /// Encode and write to a file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> WxResult<()> {
        let encoded = self.encode_png()?;
        std::fs::write(path, encoded)?;
        Ok(())
    }
}
