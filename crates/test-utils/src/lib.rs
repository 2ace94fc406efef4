//! Shared test utilities for the wxloop workspace.
//!
//! Builders for synthetic archive products:
//! - Level II volume scans in both the legacy and current encodings
//! - ABI scenes in NetCDF classic containers
//!
//! The builders emit byte-for-byte valid inputs for the parser crates, with
//! predictable content so tests can assert on decoded values.

pub mod goes;
pub mod level2;

pub use goes::{cmip_scene, mcmip_scene, SceneSpec};
pub use level2::{current_volume, legacy_volume, RadialSpec};
