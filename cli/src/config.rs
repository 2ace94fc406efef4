//! Run configuration.
//!
//! Each subcommand builds one of these structs from its arguments and hands
//! it to the pipeline; nothing is read from globals or edited constants.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use renderer::FrameStyle;
use wx_common::{RadarSelector, SatelliteSelector, TimeWindow};

/// One satellite frame rendered to a PNG.
#[derive(Debug, Clone)]
pub struct SatelliteFrameConfig {
    pub selector: SatelliteSelector,
    pub at: DateTime<Utc>,
    pub style: FrameStyle,
    pub output: PathBuf,
}

/// A satellite time window compiled into a looping GIF.
#[derive(Debug, Clone)]
pub struct SatelliteLoopConfig {
    pub selector: SatelliteSelector,
    pub window: TimeWindow,
    pub style: FrameStyle,
    pub frame_delay_ms: u32,
    pub output: PathBuf,
}

/// One radar volume rendered to a PNG.
#[derive(Debug, Clone)]
pub struct RadarFrameConfig {
    pub selector: RadarSelector,
    pub at: DateTime<Utc>,
    pub style: FrameStyle,
    pub output: PathBuf,
}
