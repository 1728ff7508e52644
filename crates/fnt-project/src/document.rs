//! The serialized project metadata document.
//!
//! The document is what the meta resource's blob contains: song metadata,
//! the full allocation table and the resource tree. Field names are part of
//! the on-disk format. There is no version field, so a format change has no
//! migration hook yet.

use serde::{Deserialize, Serialize};

use crate::allocator::AllocationTable;
use crate::error::ProjectResult;
use crate::tree::ResourceTree;

/// Free-text song metadata shown by the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInfo {
    /// Project title.
    pub name: String,
    pub song_name: String,
    pub song_name_romanized: String,
    pub artist: String,
    pub artist_romanized: String,
}

/// Full metadata of a project, as saved in the meta blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetaDocument {
    #[serde(flatten)]
    pub info: SongInfo,
    /// Every id ever allocated in the project, with its kind.
    pub uuids: AllocationTable,
    pub resources: ResourceTree,
}

impl ProjectMetaDocument {
    /// Encode as UTF-8 JSON.
    pub fn to_json(&self) -> ProjectResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from JSON. Only the JSON shape is checked; the invariants
    /// between `uuids` and `resources` are not.
    pub fn from_json(data: &[u8]) -> ProjectResult<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}
