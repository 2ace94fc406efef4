//! NEXRAD Level II volume scan decoding.
//!
//! Handles both archive encodings behind one entry point:
//! - **Legacy** (`ARCHIVE2` header, pre-2008): fixed 2432-byte records
//!   carrying message type 1 digital radar data.
//! - **Current** (`AR2V00xx` header): bzip2-compressed LDM records carrying
//!   message type 31 generic radial data.
//!
//! The encoding is sniffed from the volume header magic at decode time, so
//! callers never choose a format up front.

use chrono::{DateTime, Duration, TimeZone, Utc};
use thiserror::Error;

use wx_common::VolumeFormat;

mod current;
mod legacy;

/// Result type for Level II decoding.
pub type Level2Result<T> = Result<T, Level2Error>;

/// Error types for Level II decoding.
#[derive(Debug, Error)]
pub enum Level2Error {
    #[error("Truncated volume: {0}")]
    Truncated(String),

    #[error("Invalid volume format: {0}")]
    InvalidFormat(String),

    #[error("Decompression failed: {0}")]
    Decompression(String),

    #[error("No reflectivity data in volume")]
    NoReflectivity,
}

/// One decoded volume scan.
#[derive(Debug, Clone)]
pub struct VolumeScan {
    /// Four-letter site id from the volume header.
    pub site: String,
    /// Volume collection start time.
    pub timestamp: DateTime<Utc>,
    /// Encoding the volume arrived in.
    pub format: VolumeFormat,
    /// Elevation sweeps, ordered by elevation number.
    pub sweeps: Vec<Sweep>,
}

impl VolumeScan {
    /// The lowest elevation sweep, the one rendered for base reflectivity.
    pub fn base_sweep(&self) -> Option<&Sweep> {
        self.sweeps.first()
    }
}

/// All radials collected at one elevation cut.
#[derive(Debug, Clone)]
pub struct Sweep {
    pub elevation_number: u8,
    pub elevation_deg: f32,
    pub radials: Vec<Radial>,
}

/// One radial of reflectivity gates.
#[derive(Debug, Clone)]
pub struct Radial {
    /// Azimuth of the radial center, degrees clockwise from north.
    pub azimuth_deg: f32,
    /// Range to the center of the first gate, meters.
    pub first_gate_m: f32,
    /// Gate-to-gate spacing, meters.
    pub gate_spacing_m: f32,
    /// Reflectivity per gate in dBZ; None for below-threshold or
    /// range-folded gates.
    pub gates: Vec<Option<f32>>,
}

/// Decode a complete Level II volume, dispatching on the header magic.
pub fn decode_volume(data: &[u8]) -> Level2Result<VolumeScan> {
    let format = VolumeFormat::detect(data)
        .map_err(|e| Level2Error::InvalidFormat(e.to_string()))?;

    let header = VolumeHeader::parse(data)?;
    let body = &data[VolumeHeader::LEN..];

    let sweeps = match format {
        VolumeFormat::Current => current::decode_sweeps(body)?,
        VolumeFormat::Legacy => legacy::decode_sweeps(body)?,
    };

    if sweeps.iter().all(|s| s.radials.is_empty()) {
        return Err(Level2Error::NoReflectivity);
    }

    Ok(VolumeScan {
        site: header.icao,
        timestamp: header.timestamp,
        format,
        sweeps,
    })
}

/// The 24-byte volume header record shared by both encodings.
#[derive(Debug, Clone)]
pub(crate) struct VolumeHeader {
    pub icao: String,
    pub timestamp: DateTime<Utc>,
}

impl VolumeHeader {
    pub const LEN: usize = 24;

    pub fn parse(data: &[u8]) -> Level2Result<Self> {
        if data.len() < Self::LEN {
            return Err(Level2Error::Truncated(format!(
                "volume header needs {} bytes, have {}",
                Self::LEN,
                data.len()
            )));
        }

        // Bytes 0..12 are the magic and extension number, already sniffed.
        let date = read_u32(data, 12);
        let ms = read_u32(data, 16);
        let icao = String::from_utf8_lossy(&data[20..24]).trim().to_string();

        Ok(Self {
            icao,
            timestamp: nexrad_datetime(date, ms),
        })
    }
}

/// Convert the NEXRAD date/time pair (days since 1970-01-01 where day 1 is
/// the epoch, plus milliseconds past midnight) to a UTC timestamp.
pub(crate) fn nexrad_datetime(julian_date: u32, ms_of_day: u32) -> DateTime<Utc> {
    let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
    epoch
        + Duration::days(julian_date.saturating_sub(1) as i64)
        + Duration::milliseconds(ms_of_day as i64)
}

// ===== Byte readers (big-endian, as the ICD specifies) =====

pub(crate) fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

pub(crate) fn read_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([data[offset], data[offset + 1]])
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

pub(crate) fn read_i32(data: &[u8], offset: usize) -> i32 {
    i32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

pub(crate) fn read_f32(data: &[u8], offset: usize) -> f32 {
    f32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nexrad_datetime() {
        // Day 1 = 1970-01-01.
        let t = nexrad_datetime(1, 0);
        assert_eq!(t, Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());

        // 2025-06-19 is 20258 days after the epoch.
        let t = nexrad_datetime(20259, 22 * 3_600_000);
        assert_eq!(t, Utc.with_ymd_and_hms(2025, 6, 19, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_volume_header_parse() {
        let mut data = Vec::new();
        data.extend_from_slice(b"AR2V0006.501");
        data.extend_from_slice(&20259u32.to_be_bytes());
        data.extend_from_slice(&(22u32 * 3_600_000).to_be_bytes());
        data.extend_from_slice(b"KMOB");

        let header = VolumeHeader::parse(&data).unwrap();
        assert_eq!(header.icao, "KMOB");
        assert_eq!(
            header.timestamp,
            Utc.with_ymd_and_hms(2025, 6, 19, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_truncated_volume_rejected() {
        assert!(matches!(
            VolumeHeader::parse(b"AR2V"),
            Err(Level2Error::Truncated(_))
        ));
    }
}
