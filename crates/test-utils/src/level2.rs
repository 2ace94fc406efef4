//! Synthetic NEXRAD Level II volumes.

use std::io::Write;

use bzip2::write::BzEncoder;
use bzip2::Compression;
use chrono::{DateTime, Utc};

/// One synthetic radial.
#[derive(Debug, Clone)]
pub struct RadialSpec {
    pub azimuth_deg: f32,
    pub elevation_number: u8,
    pub elevation_deg: f32,
    /// Reflectivity in dBZ per gate; None encodes below-threshold.
    pub gates: Vec<Option<f32>>,
}

impl RadialSpec {
    /// A radial with a constant reflectivity across `gates` gates.
    pub fn uniform(azimuth_deg: f32, dbz: f32, gates: usize) -> Self {
        Self {
            azimuth_deg,
            elevation_number: 1,
            elevation_deg: 0.5,
            gates: vec![Some(dbz); gates],
        }
    }
}

/// Reflectivity moment coding used by the current-format builder
/// (dBZ = (raw - OFFSET) / SCALE).
const REF_SCALE: f32 = 2.0;
const REF_OFFSET: f32 = 66.0;

const CTM_LEN: usize = 12;
const LEGACY_RECORD_LEN: usize = 2432;
const ANGLE_SCALE: f32 = 180.0 / 32768.0;

/// Build a current-format (`AR2V`) volume containing the given radials in
/// one bzip2-compressed LDM record.
pub fn current_volume(site: &str, at: DateTime<Utc>, radials: &[RadialSpec]) -> Vec<u8> {
    let mut volume = volume_header(b"AR2V0006.", site, at);

    let mut record = Vec::new();
    for radial in radials {
        record.extend_from_slice(&message31(radial));
    }

    let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&record).unwrap();
    let compressed = encoder.finish().unwrap();

    // Negative control word marks the final LDM record.
    volume.extend_from_slice(&(-(compressed.len() as i32)).to_be_bytes());
    volume.extend_from_slice(&compressed);
    volume
}

/// Build a legacy-format (`ARCHIVE2`) volume with one fixed-length record
/// per radial.
pub fn legacy_volume(site: &str, at: DateTime<Utc>, radials: &[RadialSpec]) -> Vec<u8> {
    let mut volume = volume_header(b"ARCHIVE2.", site, at);
    for radial in radials {
        volume.extend_from_slice(&legacy_record(radial));
    }
    volume
}

fn volume_header(magic: &[u8; 9], site: &str, at: DateTime<Utc>) -> Vec<u8> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    let days = (at - epoch).num_days() as u32 + 1;
    let midnight = epoch + chrono::Duration::days(days as i64 - 1);
    let ms = (at - midnight).num_milliseconds() as u32;

    let mut header = Vec::with_capacity(24);
    header.extend_from_slice(magic);
    header.extend_from_slice(b"001");
    header.extend_from_slice(&days.to_be_bytes());
    header.extend_from_slice(&ms.to_be_bytes());
    header.extend_from_slice(&site.as_bytes()[0..4]);
    header
}

/// One CTM header + 16-byte message header + message 31 body.
fn message31(radial: &RadialSpec) -> Vec<u8> {
    // Body: 32-byte data header, one block pointer, REF moment block.
    let moment = ref_moment_block(radial);
    let mut body = Vec::new();

    body.extend_from_slice(b"KXXX"); // radar id, unused by the decoder
    body.extend_from_slice(&0u32.to_be_bytes()); // collect time
    body.extend_from_slice(&0u16.to_be_bytes()); // collect date
    body.extend_from_slice(&0u16.to_be_bytes()); // azimuth number
    body.extend_from_slice(&radial.azimuth_deg.to_be_bytes());
    body.push(0); // compression indicator
    body.push(0); // spare
    body.extend_from_slice(&0u16.to_be_bytes()); // radial byte count
    body.push(0); // azimuth resolution
    body.push(0); // radial status
    body.push(radial.elevation_number);
    body.push(0); // cut sector
    body.extend_from_slice(&radial.elevation_deg.to_be_bytes());
    body.push(0); // spot blanking
    body.push(0); // azimuth indexing
    body.extend_from_slice(&1u16.to_be_bytes()); // data block count

    // Single pointer to the moment block, relative to the data header start.
    let pointer = 32u32 + 4;
    body.extend_from_slice(&pointer.to_be_bytes());
    body.extend_from_slice(&moment);

    if body.len() % 2 != 0 {
        body.push(0);
    }

    let size_halfwords = ((16 + body.len()) / 2) as u16;
    let mut msg = vec![0u8; CTM_LEN];
    msg.extend_from_slice(&size_halfwords.to_be_bytes());
    msg.push(0); // RDA channel
    msg.push(31); // message type
    msg.extend_from_slice(&[0u8; 12]); // seq, date, time, segments
    msg.extend_from_slice(&body);
    msg
}

fn ref_moment_block(radial: &RadialSpec) -> Vec<u8> {
    let mut block = Vec::new();
    block.extend_from_slice(b"DREF");
    block.extend_from_slice(&0u32.to_be_bytes()); // reserved
    block.extend_from_slice(&(radial.gates.len() as u16).to_be_bytes());
    block.extend_from_slice(&2125u16.to_be_bytes()); // first gate (m)
    block.extend_from_slice(&250u16.to_be_bytes()); // gate spacing (m)
    block.extend_from_slice(&0u16.to_be_bytes()); // range to last gate
    block.extend_from_slice(&0u16.to_be_bytes()); // SNR threshold
    block.push(0); // control flags
    block.push(8); // data word size
    block.extend_from_slice(&REF_SCALE.to_be_bytes());
    block.extend_from_slice(&REF_OFFSET.to_be_bytes());
    for gate in &radial.gates {
        block.push(match gate {
            None => 0,
            Some(dbz) => (dbz * REF_SCALE + REF_OFFSET).round() as u8,
        });
    }
    block
}

/// One fixed 2432-byte legacy record carrying a message type 1 radial.
fn legacy_record(radial: &RadialSpec) -> Vec<u8> {
    let mut record = vec![0u8; CTM_LEN];

    // 16-byte message header.
    let size_halfwords = ((LEGACY_RECORD_LEN - CTM_LEN) / 2) as u16;
    record.extend_from_slice(&size_halfwords.to_be_bytes());
    record.push(0); // RDA channel
    record.push(1); // message type
    record.extend_from_slice(&[0u8; 12]);

    // Message 1 data header (46 bytes), gate data directly after it.
    let mut msg = vec![0u8; 46];
    let az = (radial.azimuth_deg / ANGLE_SCALE).round() as u16;
    let el = (radial.elevation_deg / ANGLE_SCALE).round() as u16;
    msg[8..10].copy_from_slice(&az.to_be_bytes());
    msg[14..16].copy_from_slice(&el.to_be_bytes());
    msg[16..18].copy_from_slice(&(radial.elevation_number as u16).to_be_bytes());
    msg[18..20].copy_from_slice(&0i16.to_be_bytes()); // first gate (m)
    msg[22..24].copy_from_slice(&1000u16.to_be_bytes()); // gate spacing (m)
    msg[26..28].copy_from_slice(&(radial.gates.len() as u16).to_be_bytes());
    msg[36..38].copy_from_slice(&46u16.to_be_bytes()); // data pointer

    for gate in &radial.gates {
        msg.push(match gate {
            None => 0,
            // dBZ = (raw - 2) * 0.5 - 32
            Some(dbz) => ((dbz + 32.0) * 2.0 + 2.0).round() as u8,
        });
    }

    record.extend_from_slice(&msg);
    record.resize(LEGACY_RECORD_LEN, 0);
    record
}
