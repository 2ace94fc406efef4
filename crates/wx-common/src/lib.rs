//! Common types shared across the wxloop crates.

pub mod error;
pub mod product;
pub mod time;

pub use error::{WxError, WxResult};
pub use product::{Channel, RadarSelector, Satellite, SatelliteSelector, Sector, VolumeFormat};
pub use time::TimeWindow;
