//! Clients for the public GOES-R and NEXRAD Level II archives on S3.
//!
//! Both archives are open buckets, so requests are unsigned. Each client
//! wraps an [`ObjectStore`], which keeps the network edge injectable: tests
//! run against an in-memory store seeded with synthetic products.

use std::sync::Arc;

use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::ObjectStore;
use tracing::debug;

use wx_common::{WxError, WxResult};

mod goes;
mod nexrad;

pub use goes::GoesArchive;
pub use nexrad::NexradArchive;

/// Build an anonymous client for a public bucket.
fn public_bucket(bucket: &str) -> WxResult<Arc<dyn ObjectStore>> {
    let store = AmazonS3Builder::new()
        .with_bucket_name(bucket)
        .with_region("us-east-1")
        .with_skip_signature(true)
        .build()
        .map_err(|e| {
            WxError::TransientFetch(format!("failed to create client for {bucket}: {e}"))
        })?;
    Ok(Arc::new(store))
}

/// List object keys under a prefix.
async fn list_keys(store: &Arc<dyn ObjectStore>, prefix: &str) -> WxResult<Vec<String>> {
    let prefix_path = Path::from(prefix);
    let mut keys = Vec::new();

    let mut stream = store.list(Some(&prefix_path));
    while let Some(meta) = stream.try_next().await.map_err(map_store_err)? {
        keys.push(meta.location.to_string());
    }

    debug!(prefix, count = keys.len(), "Listed archive objects");
    Ok(keys)
}

/// Fetch one object in full.
async fn fetch_object(store: &Arc<dyn ObjectStore>, key: &str) -> WxResult<Bytes> {
    let location = Path::from(key);
    let result = store.get(&location).await.map_err(map_store_err)?;
    let bytes = result.bytes().await.map_err(map_store_err)?;

    debug!(key, size = bytes.len(), "Fetched archive object");
    Ok(bytes)
}

/// A missing object is terminal; everything else at the storage layer is
/// worth retrying with a fresh invocation.
fn map_store_err(err: object_store::Error) -> WxError {
    match err {
        object_store::Error::NotFound { path, .. } => WxError::NotFound(path),
        other => WxError::TransientFetch(other.to_string()),
    }
}

/// The last path segment of an object key.
fn object_filename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
