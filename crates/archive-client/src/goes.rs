//! GOES-R ABI archive client.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use object_store::ObjectStore;
use tracing::{info, instrument};

use goes_parser::SatelliteScene;
use wx_common::{SatelliteSelector, WxError, WxResult};

use crate::{fetch_object, list_keys, object_filename, public_bucket};

/// One scan available in the archive.
#[derive(Debug, Clone)]
pub struct ArchiveScan {
    pub key: String,
    pub scan_start: DateTime<Utc>,
}

/// Client for one satellite product stream in a GOES archive bucket.
pub struct GoesArchive {
    store: Arc<dyn ObjectStore>,
    selector: SatelliteSelector,
}

impl GoesArchive {
    /// Connect to the satellite's public bucket.
    pub fn open(selector: SatelliteSelector) -> WxResult<Self> {
        let store = public_bucket(selector.satellite.bucket())?;
        Ok(Self::with_store(store, selector))
    }

    /// Use an existing store, e.g. an in-memory one in tests.
    pub fn with_store(store: Arc<dyn ObjectStore>, selector: SatelliteSelector) -> Self {
        Self { store, selector }
    }

    /// Scans in the hour around `at`, sorted by scan start.
    ///
    /// The bucket keys are partitioned by hour, so the adjacent hours are
    /// listed as well; the nearest scan to an on-the-hour timestamp may sit
    /// on either side of the partition boundary.
    #[instrument(skip(self), fields(product = %self.selector.product_name()))]
    pub async fn scans_near(&self, at: DateTime<Utc>) -> WxResult<Vec<ArchiveScan>> {
        let mut scans = Vec::new();
        for hour in [at - Duration::hours(1), at, at + Duration::hours(1)] {
            let prefix = self.selector.key_prefix(hour);
            for key in list_keys(&self.store, &prefix).await? {
                let filename = object_filename(&key);
                if !self.selector.matches_object(filename) {
                    continue;
                }
                if let Some(scan_start) = SatelliteSelector::parse_scan_start(filename) {
                    scans.push(ArchiveScan { key, scan_start });
                }
            }
        }
        scans.sort_by_key(|s| s.scan_start);
        Ok(scans)
    }

    /// Fetch and decode the scan closest in time to `at`.
    #[instrument(skip(self), fields(product = %self.selector.product_name()))]
    pub async fn fetch_nearest(&self, at: DateTime<Utc>) -> WxResult<SatelliteScene> {
        let scans = self.scans_near(at).await?;
        let nearest = scans
            .into_iter()
            .min_by_key(|s| (s.scan_start - at).abs())
            .ok_or_else(|| {
                WxError::NotFound(format!(
                    "no {} scans near {}",
                    self.selector.product_name(),
                    at.format("%Y-%m-%dT%H:%M:%SZ")
                ))
            })?;

        info!(
            key = %nearest.key,
            scan_start = %nearest.scan_start,
            "Selected nearest satellite scan"
        );
        let data = fetch_object(&self.store, &nearest.key).await?;
        SatelliteScene::decode(&data).map_err(|e| WxError::Decode(e.to_string()))
    }
}
