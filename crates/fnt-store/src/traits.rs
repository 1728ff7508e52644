use async_trait::async_trait;
use fnt_types::{ProjectId, ResourceId};

use crate::blob::{NewBlob, StoredBlob};
use crate::error::StoreResult;

/// Persistent key/value store for resource payloads.
///
/// All implementations must satisfy these invariants:
/// - A blob is keyed by its resource id alone; the project id is a tag used
///   for bulk lookups and deletion.
/// - `create_blob` fails with [`StoreError::AlreadyExists`] instead of
///   overwriting.
/// - `update_blob` replaces the payload of an existing blob and fails with
///   [`StoreError::NotFound`] otherwise.
/// - All I/O errors are propagated, never silently ignored.
///
/// [`StoreError::AlreadyExists`]: crate::StoreError::AlreadyExists
/// [`StoreError::NotFound`]: crate::StoreError::NotFound
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a new payload, stamping creation and update times.
    async fn create_blob(&self, blob: NewBlob) -> StoreResult<()>;

    /// Replace the payload stored under `id`.
    async fn update_blob(&self, id: &ResourceId, payload: Vec<u8>) -> StoreResult<()>;

    /// Read a blob by id. Returns `Ok(None)` if it does not exist.
    async fn get_blob(&self, id: &ResourceId) -> StoreResult<Option<StoredBlob>>;

    /// Read the metadata document blob of a project.
    async fn get_meta_blob(&self, project: ProjectId) -> StoreResult<Option<StoredBlob>>;

    /// Remove every blob tagged with `project`, returning how many were removed.
    async fn delete_all_blobs(&self, project: ProjectId) -> StoreResult<usize>;
}
