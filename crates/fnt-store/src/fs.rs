use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use fnt_types::{ProjectId, ResourceId, ResourceKind};
use tokio::fs;
use tracing::{debug, warn};

use crate::blob::{NewBlob, StoredBlob};
use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

const HEADER_EXT: &str = "json";
const PAYLOAD_EXT: &str = "bin";

/// Directory-backed blob store.
///
/// Each blob occupies two files named after its id:
/// ```text
/// <root>/<id>.json   header (id, name, project, kind, timestamps)
/// <root>/<id>.bin    raw payload
/// ```
/// The header is written last and removed first, so a blob exists exactly
/// when its header does. Files are replaced through a temporary sibling and
/// a rename.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "opened blob store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn header_path(&self, id: &ResourceId) -> PathBuf {
        self.root.join(format!("{id}.{HEADER_EXT}"))
    }

    fn payload_path(&self, id: &ResourceId) -> PathBuf {
        self.root.join(format!("{id}.{PAYLOAD_EXT}"))
    }

    async fn write_atomic(path: &Path, data: &[u8]) -> StoreResult<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn write_header(&self, blob: &StoredBlob) -> StoreResult<()> {
        let header =
            serde_json::to_vec_pretty(blob).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Self::write_atomic(&self.header_path(&blob.id), &header).await
    }

    async fn read_header(path: &Path) -> StoreResult<Option<StoredBlob>> {
        match fs::read(path).await {
            Ok(data) => serde_json::from_slice(&data)
                .map(Some)
                .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Attach the payload to a header read from disk.
    async fn load_payload(&self, mut blob: StoredBlob) -> StoreResult<StoredBlob> {
        blob.payload = fs::read(self.payload_path(&blob.id)).await?;
        Ok(blob)
    }

    /// All headers in the store, in directory order.
    async fn headers(&self) -> StoreResult<Vec<StoredBlob>> {
        let mut headers = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(HEADER_EXT) {
                continue;
            }
            match Self::read_header(&path).await {
                Ok(Some(header)) => headers.push(header),
                Ok(None) => {}
                Err(StoreError::Serialization(reason)) => {
                    warn!(%reason, "skipping unreadable blob header");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(headers)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn create_blob(&self, blob: NewBlob) -> StoreResult<()> {
        if Self::read_header(&self.header_path(&blob.id)).await?.is_some() {
            return Err(StoreError::AlreadyExists(blob.id));
        }
        let stored = blob.into_stored(Utc::now());
        Self::write_atomic(&self.payload_path(&stored.id), &stored.payload).await?;
        self.write_header(&stored).await?;
        debug!(id = %stored.id, kind = %stored.kind, size = stored.size(), "created blob");
        Ok(())
    }

    async fn update_blob(&self, id: &ResourceId, payload: Vec<u8>) -> StoreResult<()> {
        let mut header = Self::read_header(&self.header_path(id))
            .await?
            .ok_or(StoreError::NotFound(*id))?;
        Self::write_atomic(&self.payload_path(id), &payload).await?;
        header.updated_at = Utc::now();
        self.write_header(&header).await?;
        debug!(%id, size = payload.len(), "updated blob");
        Ok(())
    }

    async fn get_blob(&self, id: &ResourceId) -> StoreResult<Option<StoredBlob>> {
        match Self::read_header(&self.header_path(id)).await? {
            Some(header) => self.load_payload(header).await.map(Some),
            None => Ok(None),
        }
    }

    async fn get_meta_blob(&self, project: ProjectId) -> StoreResult<Option<StoredBlob>> {
        let meta = self
            .headers()
            .await?
            .into_iter()
            .find(|blob| blob.project_id == project && blob.kind == ResourceKind::Meta);
        match meta {
            Some(header) => self.load_payload(header).await.map(Some),
            None => Ok(None),
        }
    }

    async fn delete_all_blobs(&self, project: ProjectId) -> StoreResult<usize> {
        let mut removed = 0;
        for header in self.headers().await? {
            if header.project_id != project {
                continue;
            }
            fs::remove_file(self.header_path(&header.id)).await?;
            match fs::remove_file(self.payload_path(&header.id)).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            removed += 1;
        }
        debug!(%project, removed, "deleted project blobs");
        Ok(removed)
    }
}
