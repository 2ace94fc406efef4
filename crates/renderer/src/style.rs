//! Frame style configuration.
//!
//! Every render call takes an explicit style struct; nothing is configured
//! through globals.

use serde::{Deserialize, Serialize};

use wx_common::{WxError, WxResult};

use crate::colormap::Colormap;

/// Geographic extent: [min_lon, max_lon, min_lat, max_lat] in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Extent {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Named regional presets.
    pub fn preset(name: &str) -> WxResult<Self> {
        let e = match name.to_ascii_lowercase().as_str() {
            "conus" => Self::new(-125.0, -65.0, 20.0, 50.0),
            "southeast" => Self::new(-95.0, -75.0, 25.0, 38.0),
            "northeast" => Self::new(-85.0, -65.0, 35.0, 50.0),
            "northwest" => Self::new(-130.0, -105.0, 38.0, 50.0),
            "southwest" => Self::new(-125.0, -100.0, 25.0, 40.0),
            "central" => Self::new(-105.0, -85.0, 30.0, 45.0),
            "great-lakes" => Self::new(-95.0, -75.0, 38.0, 50.0),
            "gulf" => Self::new(-98.0, -80.0, 24.0, 32.0),
            other => {
                return Err(WxError::InvalidSelector(format!(
                    "unknown extent preset: {other}"
                )))
            }
        };
        Ok(e)
    }
}

/// Style configuration for rendering one frame.
#[derive(Debug, Clone)]
pub struct FrameStyle {
    /// Output image width in pixels.
    pub width: usize,
    /// Output image height in pixels; the banner overlays the bottom rows.
    pub height: usize,
    pub colormap: Colormap,
    /// Background for pixels with no data.
    pub background: crate::colormap::Color,
    /// Geographic crop; None renders the raw product grid.
    pub extent: Option<Extent>,
    /// Draw the identifier/timestamp banner along the bottom edge.
    pub banner: bool,
    /// Banner title; the product identifier is used when None.
    pub title: Option<String>,
}

impl FrameStyle {
    /// Defaults for single-band satellite imagery.
    pub fn satellite(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            colormap: Colormap::grayscale(0.0, 1.0),
            background: crate::colormap::Color::rgb(10, 10, 10),
            extent: None,
            banner: true,
            title: None,
        }
    }

    /// Defaults for base reflectivity.
    pub fn radar(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            colormap: Colormap::nws_reflectivity(),
            background: crate::colormap::Color::rgb(26, 26, 26),
            extent: None,
            banner: true,
            title: None,
        }
    }

    pub fn validate(&self) -> WxResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WxError::Render(format!(
                "frame dimensions must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(e) = &self.extent {
            if e.min_lon >= e.max_lon || e.min_lat >= e.max_lat {
                return Err(WxError::Render(format!("degenerate extent: {e:?}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_presets() {
        let conus = Extent::preset("CONUS").unwrap();
        assert_eq!(conus.min_lon, -125.0);
        assert!(Extent::preset("atlantis").is_err());
    }

    #[test]
    fn test_style_validation() {
        let mut style = FrameStyle::satellite(640, 400);
        assert!(style.validate().is_ok());

        style.width = 0;
        assert!(style.validate().is_err());

        let mut style = FrameStyle::radar(640, 640);
        style.extent = Some(Extent::new(-90.0, -100.0, 30.0, 40.0));
        assert!(style.validate().is_err());
    }
}
