//! Current-format (`AR2V`) volume decoding.
//!
//! The volume body is a series of LDM records: a 4-byte big-endian control
//! word holding the compressed size (negative on the final record), followed
//! by a bzip2 stream. The first record carries metadata messages; later
//! records carry message type 31 radials.

use std::io::Read;

use bzip2::read::BzDecoder;
use tracing::debug;

use crate::{read_f32, read_i32, read_u16, Level2Error, Level2Result, Radial, Sweep};

/// Fixed length of non-31 messages inside a record (CTM + header + payload).
const FIXED_MESSAGE_LEN: usize = 2432;

/// Legacy CTM padding in front of every message header.
const CTM_LEN: usize = 12;

/// Length of the 16-byte message header.
const MESSAGE_HEADER_LEN: usize = 16;

pub(crate) fn decode_sweeps(body: &[u8]) -> Level2Result<Vec<Sweep>> {
    let mut radials: Vec<(u8, f32, Radial)> = Vec::new();

    let mut pos = 0;
    while pos + 4 <= body.len() {
        let control = read_i32(body, pos);
        if control == 0 {
            break;
        }
        let size = control.unsigned_abs() as usize;
        pos += 4;

        if pos + size > body.len() {
            return Err(Level2Error::Truncated(format!(
                "LDM record claims {} bytes, only {} remain",
                size,
                body.len() - pos
            )));
        }

        let record = decompress_record(&body[pos..pos + size])?;
        collect_radials(&record, &mut radials)?;
        pos += size;

        if control < 0 {
            break;
        }
    }

    debug!(radials = radials.len(), "Decoded current-format volume body");
    Ok(group_sweeps(radials))
}

fn decompress_record(compressed: &[u8]) -> Level2Result<Vec<u8>> {
    let mut decoder = BzDecoder::new(compressed);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Level2Error::Decompression(e.to_string()))?;
    Ok(out)
}

/// Walk the messages in one decompressed record, keeping type 31 radials.
fn collect_radials(record: &[u8], radials: &mut Vec<(u8, f32, Radial)>) -> Level2Result<()> {
    let mut pos = 0;

    while pos + CTM_LEN + MESSAGE_HEADER_LEN <= record.len() {
        let header = &record[pos + CTM_LEN..];
        let size_halfwords = read_u16(header, 0) as usize;
        if size_halfwords == 0 {
            // Zero-filled padding at the end of the record.
            break;
        }
        let msg_type = header[3];

        if msg_type == 31 {
            let msg_start = pos + CTM_LEN + MESSAGE_HEADER_LEN;
            let msg_len = size_halfwords * 2 - MESSAGE_HEADER_LEN;
            if msg_start + msg_len > record.len() {
                return Err(Level2Error::Truncated(
                    "message 31 extends past record".to_string(),
                ));
            }
            if let Some(entry) = parse_message31(&record[msg_start..msg_start + msg_len])? {
                radials.push(entry);
            }
            pos = msg_start + msg_len;
        } else {
            // Metadata messages occupy fixed-length slots.
            pos += FIXED_MESSAGE_LEN;
        }
    }

    Ok(())
}

/// Parse one message 31 radial. Returns None when the radial carries no
/// reflectivity moment.
fn parse_message31(msg: &[u8]) -> Level2Result<Option<(u8, f32, Radial)>> {
    const DATA_HEADER_LEN: usize = 32;
    if msg.len() < DATA_HEADER_LEN {
        return Err(Level2Error::Truncated(
            "message 31 data header too short".to_string(),
        ));
    }

    let azimuth_deg = read_f32(msg, 12);
    let elevation_number = msg[22];
    let elevation_deg = read_f32(msg, 24);
    let block_count = read_u16(msg, 30) as usize;

    if msg.len() < DATA_HEADER_LEN + block_count * 4 {
        return Err(Level2Error::Truncated(
            "message 31 block pointers truncated".to_string(),
        ));
    }

    for i in 0..block_count {
        let pointer = crate::read_u32(msg, DATA_HEADER_LEN + i * 4) as usize;
        if pointer == 0 {
            continue;
        }
        if pointer + 4 > msg.len() {
            return Err(Level2Error::Truncated(
                "data block pointer past message end".to_string(),
            ));
        }
        if &msg[pointer..pointer + 4] == b"DREF" {
            let radial = parse_reflectivity_block(&msg[pointer..], azimuth_deg)?;
            return Ok(Some((elevation_number, elevation_deg, radial)));
        }
    }

    Ok(None)
}

/// Parse a "REF" generic data moment block into a radial.
fn parse_reflectivity_block(block: &[u8], azimuth_deg: f32) -> Level2Result<Radial> {
    const MOMENT_HEADER_LEN: usize = 28;
    if block.len() < MOMENT_HEADER_LEN {
        return Err(Level2Error::Truncated(
            "moment block header too short".to_string(),
        ));
    }

    let gate_count = read_u16(block, 8) as usize;
    let first_gate_m = read_u16(block, 10) as f32;
    let gate_spacing_m = read_u16(block, 12) as f32;
    let word_size = block[19];
    let scale = read_f32(block, 20);
    let offset = read_f32(block, 24);

    if word_size != 8 {
        return Err(Level2Error::InvalidFormat(format!(
            "unsupported moment word size: {word_size}"
        )));
    }
    if block.len() < MOMENT_HEADER_LEN + gate_count {
        return Err(Level2Error::Truncated(
            "moment block gate data truncated".to_string(),
        ));
    }
    if scale == 0.0 {
        return Err(Level2Error::InvalidFormat(
            "moment scale of zero".to_string(),
        ));
    }

    let gates = block[MOMENT_HEADER_LEN..MOMENT_HEADER_LEN + gate_count]
        .iter()
        .map(|&raw| match raw {
            // 0 = below threshold, 1 = range folded.
            0 | 1 => None,
            raw => Some((raw as f32 - offset) / scale),
        })
        .collect();

    Ok(Radial {
        azimuth_deg,
        first_gate_m,
        gate_spacing_m,
        gates,
    })
}

/// Group radials into sweeps by elevation number, preserving radial order.
pub(crate) fn group_sweeps(radials: Vec<(u8, f32, Radial)>) -> Vec<Sweep> {
    let mut sweeps: Vec<Sweep> = Vec::new();

    for (elevation_number, elevation_deg, radial) in radials {
        match sweeps
            .iter_mut()
            .find(|s| s.elevation_number == elevation_number)
        {
            Some(sweep) => sweep.radials.push(radial),
            None => sweeps.push(Sweep {
                elevation_number,
                elevation_deg,
                radials: vec![radial],
            }),
        }
    }

    sweeps.sort_by_key(|s| s.elevation_number);
    sweeps
}
