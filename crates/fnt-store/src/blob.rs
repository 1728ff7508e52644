use chrono::{DateTime, Utc};
use fnt_types::{ProjectId, ResourceId, ResourceKind};
use serde::{Deserialize, Serialize};

/// A payload about to be written with [`BlobStore::create_blob`].
///
/// [`BlobStore::create_blob`]: crate::BlobStore::create_blob
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBlob {
    pub id: ResourceId,
    /// File name of the resource, kept for listings and exports.
    pub name: String,
    pub project_id: ProjectId,
    pub kind: ResourceKind,
    pub payload: Vec<u8>,
}

impl NewBlob {
    /// Stamp the blob with `now` as both creation and update time.
    pub fn into_stored(self, now: DateTime<Utc>) -> StoredBlob {
        StoredBlob {
            id: self.id,
            name: self.name,
            project_id: self.project_id,
            kind: self.kind,
            payload: self.payload,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A blob as held by a store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    pub id: ResourceId,
    pub name: String,
    pub project_id: ProjectId,
    pub kind: ResourceKind,
    #[serde(skip)]
    pub payload: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredBlob {
    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }

    /// Replace the payload and bump `updated_at`.
    pub fn replace_payload(&mut self, payload: Vec<u8>, now: DateTime<Utc>) {
        self.payload = payload;
        self.updated_at = now;
    }
}
