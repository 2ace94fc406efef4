//! NEXRAD Level II archive client.

use std::sync::Arc;

use chrono::{DateTime, Duration, Timelike, Utc};
use object_store::ObjectStore;
use tracing::{info, instrument};

use level2_parser::{decode_volume, VolumeScan};
use wx_common::{RadarSelector, WxError, WxResult};

use crate::{fetch_object, list_keys, object_filename, public_bucket};

const NEXRAD_BUCKET: &str = "noaa-nexrad-level2";

/// One volume scan available in the archive.
#[derive(Debug, Clone)]
pub struct ArchiveVolume {
    pub key: String,
    pub scan_time: DateTime<Utc>,
}

/// Client for one radar site's stream in the Level II archive bucket.
pub struct NexradArchive {
    store: Arc<dyn ObjectStore>,
    selector: RadarSelector,
}

impl NexradArchive {
    /// Connect to the public Level II bucket.
    pub fn open(selector: RadarSelector) -> WxResult<Self> {
        let store = public_bucket(NEXRAD_BUCKET)?;
        Ok(Self::with_store(store, selector))
    }

    /// Use an existing store, e.g. an in-memory one in tests.
    pub fn with_store(store: Arc<dyn ObjectStore>, selector: RadarSelector) -> Self {
        Self { store, selector }
    }

    /// Volumes on the UTC day around `at`, sorted by scan time.
    ///
    /// Keys are partitioned by day; the neighboring day is listed too when
    /// `at` sits within an hour of midnight. Sidecar metadata objects
    /// (`*_MDM`) are not volume scans and are skipped.
    #[instrument(skip(self), fields(site = %self.selector.site))]
    pub async fn volumes_near(&self, at: DateTime<Utc>) -> WxResult<Vec<ArchiveVolume>> {
        let mut days = vec![at];
        if at.hour() == 0 {
            days.push(at - Duration::days(1));
        }
        if at.hour() == 23 {
            days.push(at + Duration::days(1));
        }

        let mut volumes = Vec::new();
        for day in days {
            let prefix = self.selector.key_prefix(day);
            for key in list_keys(&self.store, &prefix).await? {
                let filename = object_filename(&key);
                if filename.ends_with("_MDM") {
                    continue;
                }
                if let Some(scan_time) = self.selector.parse_scan_time(filename) {
                    volumes.push(ArchiveVolume { key, scan_time });
                }
            }
        }
        volumes.sort_by_key(|v| v.scan_time);
        Ok(volumes)
    }

    /// Fetch and decode the volume scan closest in time to `at`.
    ///
    /// The encoding (legacy fixed records or compressed LDM records) is
    /// detected per volume, so a run spanning the archive cutover works.
    #[instrument(skip(self), fields(site = %self.selector.site))]
    pub async fn fetch_nearest(&self, at: DateTime<Utc>) -> WxResult<VolumeScan> {
        let volumes = self.volumes_near(at).await?;
        let nearest = volumes
            .into_iter()
            .min_by_key(|v| (v.scan_time - at).abs())
            .ok_or_else(|| {
                WxError::NotFound(format!(
                    "no {} volumes near {}",
                    self.selector.site,
                    at.format("%Y-%m-%dT%H:%M:%SZ")
                ))
            })?;

        info!(
            key = %nearest.key,
            scan_time = %nearest.scan_time,
            "Selected nearest volume scan"
        );
        let data = fetch_object(&self.store, &nearest.key).await?;
        decode_volume(&data).map_err(|e| WxError::Decode(e.to_string()))
    }
}
