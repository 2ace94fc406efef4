//! Pipeline driver shared by the `wxloop` binary and its tests.

pub mod config;
pub mod pipeline;
