//! Product selectors for the satellite and radar archives.
//!
//! A selector pins down which archive objects correspond to a timestamp:
//! satellite + sector + channel for GOES-R ABI imagery, site id for NEXRAD
//! Level II volume scans.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{WxError, WxResult};

/// GOES-R series satellites with public archive buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Satellite {
    Goes16,
    Goes18,
    Goes19,
}

impl Satellite {
    /// Public S3 bucket hosting this satellite's products.
    pub fn bucket(&self) -> &'static str {
        match self {
            Satellite::Goes16 => "noaa-goes16",
            Satellite::Goes18 => "noaa-goes18",
            Satellite::Goes19 => "noaa-goes19",
        }
    }

    /// Short id used in archive file names ("G16").
    pub fn short_id(&self) -> &'static str {
        match self {
            Satellite::Goes16 => "G16",
            Satellite::Goes18 => "G18",
            Satellite::Goes19 => "G19",
        }
    }
}

impl fmt::Display for Satellite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Satellite::Goes16 => write!(f, "GOES-16"),
            Satellite::Goes18 => write!(f, "GOES-18"),
            Satellite::Goes19 => write!(f, "GOES-19"),
        }
    }
}

impl FromStr for Satellite {
    type Err = WxError;

    fn from_str(s: &str) -> WxResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "goes16" | "goes-16" | "g16" | "16" => Ok(Satellite::Goes16),
            "goes18" | "goes-18" | "g18" | "18" => Ok(Satellite::Goes18),
            "goes19" | "goes-19" | "g19" | "19" => Ok(Satellite::Goes19),
            other => Err(WxError::InvalidSelector(format!(
                "unknown satellite: {other}"
            ))),
        }
    }
}

/// ABI scan sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sector {
    Conus,
    FullDisk,
    Meso1,
    Meso2,
}

impl Sector {
    /// Abbreviation used in ABI product names (e.g. "C" in ABI-L2-CMIPC).
    pub fn abbrev(&self) -> &'static str {
        match self {
            Sector::Conus => "C",
            Sector::FullDisk => "F",
            Sector::Meso1 | Sector::Meso2 => "M",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sector::Conus => write!(f, "CONUS"),
            Sector::FullDisk => write!(f, "FullDisk"),
            Sector::Meso1 => write!(f, "Meso1"),
            Sector::Meso2 => write!(f, "Meso2"),
        }
    }
}

impl FromStr for Sector {
    type Err = WxError;

    fn from_str(s: &str) -> WxResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "conus" | "c" => Ok(Sector::Conus),
            "fulldisk" | "full" | "f" => Ok(Sector::FullDisk),
            "meso1" | "m1" => Ok(Sector::Meso1),
            "meso2" | "m2" => Ok(Sector::Meso2),
            other => Err(WxError::InvalidSelector(format!("unknown sector: {other}"))),
        }
    }
}

/// ABI spectral channel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    /// Single ABI band 1..=16 (Cloud and Moisture Imagery product).
    Band(u8),
    /// Multi-band composite built from the MCMIP product.
    GeoColor,
}

impl Channel {
    pub fn validate(&self) -> WxResult<()> {
        match self {
            Channel::Band(b) if (1..=16).contains(b) => Ok(()),
            Channel::Band(b) => Err(WxError::InvalidSelector(format!(
                "ABI band must be 1..=16, got {b}"
            ))),
            Channel::GeoColor => Ok(()),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Band(b) => write!(f, "C{b:02}"),
            Channel::GeoColor => write!(f, "GeoColor"),
        }
    }
}

impl FromStr for Channel {
    type Err = WxError;

    fn from_str(s: &str) -> WxResult<Self> {
        if s.eq_ignore_ascii_case("geocolor") {
            return Ok(Channel::GeoColor);
        }
        let digits = s.trim_start_matches(['C', 'c']);
        let band: u8 = digits
            .parse()
            .map_err(|_| WxError::InvalidSelector(format!("unknown channel: {s}")))?;
        let channel = Channel::Band(band);
        channel.validate()?;
        Ok(channel)
    }
}

/// Selects one satellite product stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatelliteSelector {
    pub satellite: Satellite,
    pub sector: Sector,
    pub channel: Channel,
}

impl SatelliteSelector {
    pub fn new(satellite: Satellite, sector: Sector, channel: Channel) -> WxResult<Self> {
        channel.validate()?;
        Ok(Self {
            satellite,
            sector,
            channel,
        })
    }

    /// ABI product directory name, e.g. "ABI-L2-CMIPC".
    pub fn product_name(&self) -> String {
        match self.channel {
            Channel::Band(_) => format!("ABI-L2-CMIP{}", self.sector.abbrev()),
            Channel::GeoColor => format!("ABI-L2-MCMIP{}", self.sector.abbrev()),
        }
    }

    /// Archive key prefix for the hour containing `at`.
    ///
    /// The GOES buckets lay scenes out as
    /// `{product}/{year}/{day-of-year}/{hour}/OR_{product}-M6C{band}_G{sat}_s{scan-start}...`.
    pub fn key_prefix(&self, at: DateTime<Utc>) -> String {
        format!(
            "{}/{}/{:03}/{:02}",
            self.product_name(),
            at.year(),
            at.ordinal(),
            at.hour()
        )
    }

    /// Whether an object file name belongs to this selector's stream.
    pub fn matches_object(&self, filename: &str) -> bool {
        let band_ok = match self.channel {
            Channel::Band(b) => filename.contains(&format!("C{b:02}_")),
            Channel::GeoColor => true,
        };
        band_ok && filename.contains(&format!("_{}_", self.satellite.short_id()))
    }

    /// Parse the scan start time out of an ABI object file name.
    ///
    /// File names carry `_sYYYYJJJHHMMSSt_` where JJJ is the day of year and
    /// t is tenths of a second.
    pub fn parse_scan_start(filename: &str) -> Option<DateTime<Utc>> {
        let idx = filename.find("_s")?;
        let stamp = filename.get(idx + 2..idx + 15)?;
        if !stamp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: i32 = stamp[0..4].parse().ok()?;
        let doy: u32 = stamp[4..7].parse().ok()?;
        let hour: u32 = stamp[7..9].parse().ok()?;
        let minute: u32 = stamp[9..11].parse().ok()?;
        let second: u32 = stamp[11..13].parse().ok()?;
        let date = chrono::NaiveDate::from_yo_opt(year, doy)?;
        let time = chrono::NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc))
    }
}

/// Selects one NEXRAD site's volume scan stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarSelector {
    pub site: String,
}

impl RadarSelector {
    /// Validated constructor; sites are four-letter ICAO ids like "KTLX".
    pub fn new(site: &str) -> WxResult<Self> {
        if site.len() != 4 || !site.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(WxError::InvalidSelector(format!(
                "radar site must be a four-letter uppercase id, got {site:?}"
            )));
        }
        Ok(Self {
            site: site.to_string(),
        })
    }

    /// Archive key prefix for the UTC day containing `at`.
    ///
    /// The Level II bucket lays volumes out as
    /// `{year}/{month}/{day}/{site}/{site}{YYYYMMDD}_{HHMMSS}...`.
    pub fn key_prefix(&self, at: DateTime<Utc>) -> String {
        format!(
            "{:04}/{:02}/{:02}/{}",
            at.year(),
            at.month(),
            at.day(),
            self.site
        )
    }

    /// Parse the scan time out of a Level II object file name.
    pub fn parse_scan_time(&self, filename: &str) -> Option<DateTime<Utc>> {
        let rest = filename.strip_prefix(self.site.as_str())?;
        let stamp = rest.get(0..15)?; // YYYYMMDD_HHMMSS
        let naive = chrono::NaiveDateTime::parse_from_str(stamp, "%Y%m%d_%H%M%S").ok()?;
        Some(DateTime::from_naive_utc_and_offset(naive, Utc))
    }
}

/// Level II volume scan encodings.
///
/// Volumes written before the 2008 build upgrades carry the `ARCHIVE2`
/// header; everything since carries `AR2V00xx`. The encoding is sniffed
/// from the fetched bytes, so one run can span the cutover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeFormat {
    Legacy,
    Current,
}

impl VolumeFormat {
    /// Detect the encoding from the volume header magic.
    pub fn detect(data: &[u8]) -> WxResult<Self> {
        if data.len() < 8 {
            return Err(WxError::Decode(
                "volume too short for a header record".to_string(),
            ));
        }
        match &data[0..8] {
            b"ARCHIVE2" => Ok(VolumeFormat::Legacy),
            magic if &magic[0..4] == b"AR2V" => Ok(VolumeFormat::Current),
            magic => Err(WxError::Decode(format!(
                "unrecognized volume header magic: {:?}",
                String::from_utf8_lossy(magic)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_satellite_key_prefix() {
        let sel = SatelliteSelector::new(Satellite::Goes16, Sector::Conus, Channel::Band(2))
            .unwrap();
        let at = Utc.with_ymd_and_hms(2019, 9, 1, 6, 0, 0).unwrap();
        // 2019-09-01 is day 244.
        assert_eq!(sel.key_prefix(at), "ABI-L2-CMIPC/2019/244/06");
    }

    #[test]
    fn test_geocolor_uses_multiband_product() {
        let sel = SatelliteSelector::new(Satellite::Goes16, Sector::Conus, Channel::GeoColor)
            .unwrap();
        assert_eq!(sel.product_name(), "ABI-L2-MCMIPC");
    }

    #[test]
    fn test_satellite_object_matching() {
        let sel = SatelliteSelector::new(Satellite::Goes16, Sector::Conus, Channel::Band(2))
            .unwrap();
        assert!(sel.matches_object("OR_ABI-L2-CMIPC-M6C02_G16_s20192440001163_e20192440003536_c20192440004046.nc"));
        assert!(!sel.matches_object("OR_ABI-L2-CMIPC-M6C13_G16_s20192440001163_e20192440003536_c20192440004046.nc"));
        assert!(!sel.matches_object("OR_ABI-L2-CMIPC-M6C02_G18_s20192440001163_e20192440003536_c20192440004046.nc"));
    }

    #[test]
    fn test_parse_scan_start() {
        let t = SatelliteSelector::parse_scan_start(
            "OR_ABI-L2-CMIPC-M6C02_G16_s20192440001163_e20192440003536_c20192440004046.nc",
        )
        .unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2019, 9, 1, 0, 1, 16).unwrap());
    }

    #[test]
    fn test_radar_selector_validation() {
        assert!(RadarSelector::new("KTLX").is_ok());
        assert!(RadarSelector::new("ktlx").is_err());
        assert!(RadarSelector::new("KTL").is_err());
        assert!(RadarSelector::new("KTLXX").is_err());
    }

    #[test]
    fn test_radar_key_prefix_and_scan_time() {
        let sel = RadarSelector::new("KMOB").unwrap();
        let at = Utc.with_ymd_and_hms(2025, 6, 19, 22, 7, 0).unwrap();
        assert_eq!(sel.key_prefix(at), "2025/06/19/KMOB");

        let t = sel.parse_scan_time("KMOB20250619_220753_V06").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2025, 6, 19, 22, 7, 53).unwrap());
    }

    #[test]
    fn test_volume_format_detection() {
        assert_eq!(
            VolumeFormat::detect(b"AR2V0006.501").unwrap(),
            VolumeFormat::Current
        );
        assert_eq!(
            VolumeFormat::detect(b"ARCHIVE2.001").unwrap(),
            VolumeFormat::Legacy
        );
        assert!(VolumeFormat::detect(b"GRIB").is_err());
        assert!(VolumeFormat::detect(b"NOPE1234").is_err());
    }

    #[test]
    fn test_channel_parsing() {
        assert_eq!("C02".parse::<Channel>().unwrap(), Channel::Band(2));
        assert_eq!("13".parse::<Channel>().unwrap(), Channel::Band(13));
        assert_eq!("geocolor".parse::<Channel>().unwrap(), Channel::GeoColor);
        assert!("C17".parse::<Channel>().is_err());
        assert!("C00".parse::<Channel>().is_err());
    }
}
