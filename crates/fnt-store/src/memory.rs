use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use fnt_types::{ProjectId, ResourceId, ResourceKind};

use crate::blob::{NewBlob, StoredBlob};
use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. All blobs are held in memory behind a
/// `RwLock` for safe concurrent access. Blobs are cloned on read.
///
/// The store can be switched to read-only, after which every write fails
/// with [`StoreError::ReadOnly`]. Callers use this to exercise their
/// persistence-failure paths.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<ResourceId, StoredBlob>>,
    read_only: AtomicBool,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            read_only: AtomicBool::new(false),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total payload bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(StoredBlob::size)
            .sum()
    }

    /// Reject (or accept again) all subsequent writes.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Sorted ids of all blobs tagged with `project`.
    pub fn project_ids(&self, project: ProjectId) -> Vec<ResourceId> {
        let map = self.blobs.read().expect("lock poisoned");
        let mut ids: Vec<ResourceId> = map
            .values()
            .filter(|blob| blob.project_id == project)
            .map(|blob| blob.id)
            .collect();
        ids.sort();
        ids
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn create_blob(&self, blob: NewBlob) -> StoreResult<()> {
        self.check_writable()?;
        let mut map = self.blobs.write().expect("lock poisoned");
        if map.contains_key(&blob.id) {
            return Err(StoreError::AlreadyExists(blob.id));
        }
        map.insert(blob.id, blob.into_stored(Utc::now()));
        Ok(())
    }

    async fn update_blob(&self, id: &ResourceId, payload: Vec<u8>) -> StoreResult<()> {
        self.check_writable()?;
        let mut map = self.blobs.write().expect("lock poisoned");
        let blob = map.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        blob.replace_payload(payload, Utc::now());
        Ok(())
    }

    async fn get_blob(&self, id: &ResourceId) -> StoreResult<Option<StoredBlob>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    async fn get_meta_blob(&self, project: ProjectId) -> StoreResult<Option<StoredBlob>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map
            .values()
            .find(|blob| blob.project_id == project && blob.kind == ResourceKind::Meta)
            .cloned())
    }

    async fn delete_all_blobs(&self, project: ProjectId) -> StoreResult<usize> {
        self.check_writable()?;
        let mut map = self.blobs.write().expect("lock poisoned");
        let before = map.len();
        map.retain(|_, blob| blob.project_id != project);
        Ok(before - map.len())
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .field("read_only", &self.read_only.load(Ordering::SeqCst))
            .finish()
    }
}
