//! Session-scoped object URLs for uploaded content.
//!
//! Mirrors the browser's `URL.createObjectURL`: bytes are kept in memory and
//! referenced through a `blob:` URL until revoked or until the store is dropped.

use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::AppError;

const BLOB_ORIGIN: &str = "agripilot-data-hub";

/// In-memory content referenced by an object URL.
#[derive(Debug, Clone)]
pub struct Blob {
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

/// Cloneable handle to the session's blobs.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    blobs: Arc<RwLock<HashMap<Url, Blob>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers content and returns a fresh `blob:` URL for it.
    pub fn create_object_url(&self, mime_type: &str, bytes: Arc<[u8]>) -> Result<Url, AppError> {
        let url = Url::parse(&format!("blob:{}/{}", BLOB_ORIGIN, Uuid::new_v4()))?;
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| AppError::Internal("Blob store lock poisoned".to_string()))?;
        blobs.insert(
            url.clone(),
            Blob {
                mime_type: mime_type.to_string(),
                bytes,
            },
        );
        Ok(url)
    }

    pub fn get(&self, url: &Url) -> Option<Blob> {
        self.blobs.read().ok()?.get(url).cloned()
    }

    /// Releases the content. Returns `false` if the URL was unknown.
    pub fn revoke(&self, url: &Url) -> bool {
        match self.blobs.write() {
            Ok(mut blobs) => {
                let removed = blobs.remove(url).is_some();
                if removed {
                    info!("Revoked object URL {}", url);
                }
                removed
            }
            Err(_) => {
                warn!("Blob store lock poisoned, cannot revoke {}", url);
                false
            }
        }
    }

    /// Inline `data:` URL for previews (images in the analysis panel).
    pub fn data_url(&self, url: &Url) -> Option<String> {
        let blob = self.get(url)?;
        let mime = if blob.mime_type.is_empty() {
            "application/octet-stream"
        } else {
            blob.mime_type.as_str()
        };
        Some(format!(
            "data:{};base64,{}",
            mime,
            general_purpose::STANDARD.encode(&blob.bytes)
        ))
    }

    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
