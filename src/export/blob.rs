//! Scoped in-memory blobs addressed by `blob:` URLs.
//!
//! The raster exporter hands serialized SVG to the decoder through this
//! store. A [`BlobUrl`] releases its entry exactly once, when it is dropped,
//! whether decoding succeeded or not.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Blob {
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

/// Registry of live blobs. Cheap to clone; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    entries: Arc<Mutex<HashMap<String, Blob>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Blob>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `bytes` and return a handle that owns the URL.
    pub fn create(&self, bytes: Vec<u8>, mime: &str) -> BlobUrl {
        let url = format!("blob:qrstudio/{}", Uuid::new_v4());
        self.lock().insert(
            url.clone(),
            Blob {
                mime: mime.to_string(),
                bytes: bytes.into(),
            },
        );
        tracing::trace!(%url, "blob created");
        BlobUrl {
            url,
            store: self.clone(),
        }
    }

    /// Look up a live blob.
    pub fn fetch(&self, url: &str) -> Option<Blob> {
        self.lock().get(url).cloned()
    }

    /// Number of blobs not yet released.
    pub fn live(&self) -> usize {
        self.lock().len()
    }

    fn revoke(&self, url: &str) -> bool {
        self.lock().remove(url).is_some()
    }
}

/// Owning handle for a blob URL. Dropping it releases the blob.
#[derive(Debug)]
pub struct BlobUrl {
    url: String,
    store: BlobStore,
}

impl BlobUrl {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for BlobUrl {
    fn drop(&mut self) {
        if self.store.revoke(&self.url) {
            tracing::trace!(url = %self.url, "blob released");
        }
    }
}
