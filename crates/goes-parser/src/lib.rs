//! GOES-R ABI scene decoding.
//!
//! Reads Cloud and Moisture Imagery products (`ABI-L2-CMIP*` single band,
//! `ABI-L2-MCMIP*` multi-band) from NetCDF classic containers and exposes
//! them as scaled physical grids plus the geostationary projection needed
//! to place them on a map.

use thiserror::Error;

pub mod netcdf;
pub mod projection;
pub mod scene;

pub use netcdf::NcFile;
pub use projection::GoesProjection;
pub use scene::{Grid, SatelliteScene, SceneData};

/// Result type for GOES decoding.
pub type GoesResult<T> = Result<T, GoesError>;

/// Error types for GOES decoding.
#[derive(Debug, Error)]
pub enum GoesError {
    #[error("Invalid NetCDF container: {0}")]
    InvalidFormat(String),

    #[error("Missing required data: {0}")]
    MissingData(String),
}
