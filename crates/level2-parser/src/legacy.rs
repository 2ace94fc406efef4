//! Legacy-format (`ARCHIVE2`) volume decoding.
//!
//! Pre-2008 volumes store message type 1 digital radar data in fixed
//! 2432-byte records: a 12-byte CTM header, a 16-byte message header, the
//! message 1 data header, then the moment data at the offsets the header
//! points to.

use tracing::debug;

use crate::{current::group_sweeps, read_u16, Level2Error, Level2Result, Radial, Sweep};

const RECORD_LEN: usize = 2432;
const CTM_LEN: usize = 12;
const MESSAGE_HEADER_LEN: usize = 16;

/// Coded angles are in units of 180/32768 degrees.
const ANGLE_SCALE: f32 = 180.0 / 32768.0;

pub(crate) fn decode_sweeps(body: &[u8]) -> Level2Result<Vec<Sweep>> {
    let mut radials: Vec<(u8, f32, Radial)> = Vec::new();

    for record in body.chunks(RECORD_LEN) {
        if record.len() < CTM_LEN + MESSAGE_HEADER_LEN {
            break;
        }
        let header = &record[CTM_LEN..];
        let msg_type = header[3];
        if msg_type != 1 {
            continue;
        }

        let msg = &record[CTM_LEN + MESSAGE_HEADER_LEN..];
        if let Some(entry) = parse_message1(msg)? {
            radials.push(entry);
        }
    }

    debug!(radials = radials.len(), "Decoded legacy-format volume body");
    Ok(group_sweeps(radials))
}

/// Parse one message 1 radial. Returns None when the radial carries no
/// surveillance (reflectivity) gates.
fn parse_message1(msg: &[u8]) -> Level2Result<Option<(u8, f32, Radial)>> {
    const DATA_HEADER_LEN: usize = 46;
    if msg.len() < DATA_HEADER_LEN {
        return Err(Level2Error::Truncated(
            "message 1 data header too short".to_string(),
        ));
    }

    let azimuth_deg = read_u16(msg, 8) as f32 * ANGLE_SCALE;
    let elevation_deg = read_u16(msg, 14) as f32 * ANGLE_SCALE;
    let elevation_number = read_u16(msg, 16) as u8;
    let first_gate_m = crate::read_i16(msg, 18) as f32;
    let gate_spacing_m = read_u16(msg, 22) as f32;
    let gate_count = read_u16(msg, 26) as usize;
    let data_pointer = read_u16(msg, 36) as usize;

    if gate_count == 0 || data_pointer == 0 {
        return Ok(None);
    }
    if data_pointer + gate_count > msg.len() {
        return Err(Level2Error::Truncated(
            "surveillance data extends past record".to_string(),
        ));
    }

    // Legacy reflectivity coding: 0 below threshold, 1 range folded,
    // otherwise dBZ in half-dB steps from -32.
    let gates = msg[data_pointer..data_pointer + gate_count]
        .iter()
        .map(|&raw| match raw {
            0 | 1 => None,
            raw => Some((raw as f32 - 2.0) * 0.5 - 32.0),
        })
        .collect();

    Ok(Some((
        elevation_number,
        elevation_deg,
        Radial {
            azimuth_deg,
            first_gate_m,
            gate_spacing_m,
            gates,
        },
    )))
}
