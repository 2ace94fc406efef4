//! Decoded ABI scene extraction.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::netcdf::{NcFile, NcValue};
use crate::projection::GoesProjection;
use crate::{GoesError, GoesResult};

/// One 2D grid of physical values (NaN for fill), row-major, north-up.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f32>,
}

impl Grid {
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }
}

/// Grid payload of a scene: one band, or the three bands a true-color
/// composite is built from.
#[derive(Debug, Clone)]
pub enum SceneData {
    Single(Grid),
    /// C02 (red), C03 (veggie) and C01 (blue) reflectance grids.
    MultiBand {
        red: Grid,
        veggie: Grid,
        blue: Grid,
    },
}

impl SceneData {
    pub fn width(&self) -> usize {
        match self {
            SceneData::Single(g) => g.width,
            SceneData::MultiBand { red, .. } => red.width,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            SceneData::Single(g) => g.height,
            SceneData::MultiBand { red, .. } => red.height,
        }
    }
}

/// One decoded satellite scene.
#[derive(Debug, Clone)]
pub struct SatelliteScene {
    /// Satellite short id from the file ("G16").
    pub platform: String,
    /// Scan start time.
    pub timestamp: DateTime<Utc>,
    /// Grid payload.
    pub data: SceneData,
    /// Scan angle x coordinate per column: `x_offset + i * x_scale` radians.
    pub x_scale: f64,
    pub x_offset: f64,
    /// Scan angle y coordinate per row: `y_offset + j * y_scale` radians.
    pub y_scale: f64,
    pub y_offset: f64,
    pub projection: GoesProjection,
}

impl SatelliteScene {
    /// Decode a CMIP (single band) or MCMIP (multi-band) product file.
    pub fn decode(bytes: &[u8]) -> GoesResult<Self> {
        let nc = NcFile::parse(bytes)?;

        let platform = nc
            .global_attr("platform_ID")
            .and_then(NcValue::as_text)
            .ok_or_else(|| GoesError::MissingData("platform_ID attribute".to_string()))?
            .to_string();

        let timestamp = parse_coverage_start(
            nc.global_attr("time_coverage_start")
                .and_then(NcValue::as_text)
                .ok_or_else(|| {
                    GoesError::MissingData("time_coverage_start attribute".to_string())
                })?,
        )?;

        let (width, height) = grid_dims(&nc)?;

        let data = if nc.var("CMI").is_some() {
            SceneData::Single(read_grid(&nc, "CMI", width, height)?)
        } else if nc.var("CMI_C02").is_some() {
            SceneData::MultiBand {
                red: read_grid(&nc, "CMI_C02", width, height)?,
                veggie: read_grid(&nc, "CMI_C03", width, height)?,
                blue: read_grid(&nc, "CMI_C01", width, height)?,
            }
        } else {
            return Err(GoesError::MissingData(
                "no CMI or CMI_C02 variable".to_string(),
            ));
        };

        let (x_scale, x_offset) = coord_linearization(&nc, "x")?;
        let (y_scale, y_offset) = coord_linearization(&nc, "y")?;
        let projection = read_projection(&nc);

        debug!(
            platform = %platform,
            width,
            height,
            "Decoded ABI scene"
        );

        Ok(Self {
            platform,
            timestamp,
            data,
            x_scale,
            x_offset,
            y_scale,
            y_offset,
            projection,
        })
    }

    /// Scan angle of column `i`, radians.
    pub fn x_rad(&self, i: usize) -> f64 {
        self.x_offset + i as f64 * self.x_scale
    }

    /// Scan angle of row `j`, radians.
    pub fn y_rad(&self, j: usize) -> f64 {
        self.y_offset + j as f64 * self.y_scale
    }

    /// Column index nearest a scan angle, if inside the grid.
    pub fn col_for_x(&self, x_rad: f64) -> Option<usize> {
        let i = ((x_rad - self.x_offset) / self.x_scale).round();
        (i >= 0.0 && (i as usize) < self.data.width()).then(|| i as usize)
    }

    /// Row index nearest a scan angle, if inside the grid.
    pub fn row_for_y(&self, y_rad: f64) -> Option<usize> {
        let j = ((y_rad - self.y_offset) / self.y_scale).round();
        (j >= 0.0 && (j as usize) < self.data.height()).then(|| j as usize)
    }
}

fn grid_dims(nc: &NcFile) -> GoesResult<(usize, usize)> {
    let width = nc
        .dims
        .iter()
        .find(|d| d.name == "x")
        .map(|d| d.len)
        .ok_or_else(|| GoesError::MissingData("x dimension".to_string()))?;
    let height = nc
        .dims
        .iter()
        .find(|d| d.name == "y")
        .map(|d| d.len)
        .ok_or_else(|| GoesError::MissingData("y dimension".to_string()))?;
    if width == 0 || height == 0 {
        return Err(GoesError::InvalidFormat("zero-sized grid".to_string()));
    }
    Ok((width, height))
}

fn read_grid(nc: &NcFile, name: &str, width: usize, height: usize) -> GoesResult<Grid> {
    let values = nc.read_var_scaled(name)?;
    if values.len() != width * height {
        return Err(GoesError::InvalidFormat(format!(
            "{name} holds {} values for a {width}x{height} grid",
            values.len()
        )));
    }
    Ok(Grid {
        width,
        height,
        values,
    })
}

/// Scan angle coordinates are stored as scaled shorts; recover the linear
/// mapping index -> radians from the coordinate variable's attributes.
fn coord_linearization(nc: &NcFile, name: &str) -> GoesResult<(f64, f64)> {
    let var = nc
        .var(name)
        .ok_or_else(|| GoesError::MissingData(format!("{name} coordinate variable")))?;
    let scale = var
        .attr_f64("scale_factor")
        .ok_or_else(|| GoesError::MissingData(format!("{name}:scale_factor")))?;
    let offset = var
        .attr_f64("add_offset")
        .ok_or_else(|| GoesError::MissingData(format!("{name}:add_offset")))?;
    Ok((scale, offset))
}

fn read_projection(nc: &NcFile) -> GoesProjection {
    let defaults = GoesProjection::default();
    let Some(var) = nc.var("goes_imager_projection") else {
        return defaults;
    };
    GoesProjection {
        perspective_point_height: var
            .attr_f64("perspective_point_height")
            .unwrap_or(defaults.perspective_point_height),
        semi_major_axis: var
            .attr_f64("semi_major_axis")
            .unwrap_or(defaults.semi_major_axis),
        semi_minor_axis: var
            .attr_f64("semi_minor_axis")
            .unwrap_or(defaults.semi_minor_axis),
        longitude_origin: var
            .attr_f64("longitude_of_projection_origin")
            .unwrap_or(defaults.longitude_origin),
    }
}

/// Parse "2019-09-01T00:01:16.3Z" style coverage timestamps.
fn parse_coverage_start(s: &str) -> GoesResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| GoesError::InvalidFormat(format!("time_coverage_start {s:?}: {e}")))
}
