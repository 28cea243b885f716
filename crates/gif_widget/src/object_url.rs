use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use uuid::Uuid;

pub const GIF_MIME: &str = "image/gif";
const URL_PREFIX: &str = "blob:gif-widget/";

/// Immutable bytes tagged with a MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl Blob {
    pub fn new(mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// In-memory registry handing out `blob:` URLs for blobs. URLs stay valid until
/// revoked.
#[derive(Debug, Default)]
pub struct ObjectUrlStore {
    blobs: Mutex<HashMap<String, Blob>>,
}

impl ObjectUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_object_url(&self, blob: Blob) -> String {
        let url = format!("{URL_PREFIX}{}", Uuid::new_v4());
        self.lock().insert(url.clone(), blob);
        url
    }

    pub fn resolve(&self, url: &str) -> Option<Blob> {
        self.lock().get(url).cloned()
    }

    pub fn revoke(&self, url: &str) -> bool {
        self.lock().remove(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Blob>> {
        // A poisoned map is still a valid map.
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
