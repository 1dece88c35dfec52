use crate::foundation::{Hash32, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Content-addressed blob reads. Attestation payloads reference the full
/// application document by hash; the store resolves that pointer.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// `Ok(None)` means the pointer is unknown; transport failures surface
    /// as `RoundError::ContentUnavailable`.
    async fn get_by_hash(&self, pointer: &Hash32) -> Result<Option<Vec<u8>>>;
}

/// In-process store keyed by blake3 content hash.
#[derive(Default)]
pub struct MemoryContentStore {
    blobs: Mutex<HashMap<Hash32, Vec<u8>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `content` and returns its hash pointer.
    pub fn put(&self, content: Vec<u8>) -> Hash32 {
        let pointer = *blake3::hash(&content).as_bytes();
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(pointer, content);
        }
        pointer
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_by_hash(&self, pointer: &Hash32) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().ok().and_then(|b| b.get(pointer).cloned()))
    }
}
