//! Frame rendering for satellite and radar imagery.
//!
//! Turns decoded products into annotated RGBA frames:
//! - ABI scenes: colormapped single band or true-color composite, either
//!   raw-grid or reprojected onto a lat/lon extent
//! - Level II volumes: top-down PPI of the base reflectivity sweep
//!
//! Frames encode to PNG (hand-rolled, indexed when the palette fits) and
//! ordered frame sequences compile to looping GIFs.

pub mod annotate;
pub mod colormap;
pub mod frame;
pub mod gif;
pub mod png;
pub mod radar;
pub mod satellite;
pub mod style;

pub use colormap::{ColorStop, Colormap};
pub use frame::Frame;
pub use gif::compile_gif;
pub use radar::render_volume;
pub use satellite::render_scene;
pub use style::{Extent, FrameStyle};
