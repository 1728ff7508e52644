//! The project metadata manager.
//!
//! [`ProjectMetaManager`] is the single entry point for changing a
//! project's resources. Every addition allocates an id, derives a filename,
//! appends a record to the tree and writes the payload to the blob store, in
//! that order. The in-memory change is committed before the store write is
//! awaited and is never rolled back: if the write fails the caller gets
//! [`ProjectError::Persistence`] and the record stays in the tree.
//!
//! Additions do not save the metadata document; call
//! [`ProjectMetaManager::save`] for that.

use std::sync::Arc;

use fnt_store::{BlobStore, NewBlob};
use fnt_types::{DiffColor, MapType, MediaKind, ProjectId, ResourceId, ResourceKind};
use tracing::{debug, info, warn};

use crate::allocator::IdAllocator;
use crate::document::{ProjectMetaDocument, SongInfo};
use crate::error::{ProjectError, ProjectResult};
use crate::names::sanitize_filename;
use crate::tree::{MapResource, ResourceRecord, ResourceTree};
use crate::validate::{validate, ValidationReport};

/// Fixed filename of the meta resource.
pub const META_FILENAME: &str = "meta.json";

/// Initial payload of a new map: an empty chart object.
const EMPTY_MAP_PAYLOAD: &[u8] = b"{}";

/// Parameters of [`ProjectMetaManager::add_map`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMap {
    pub map_type: MapType,
    pub difficulty: String,
    pub level: i64,
    pub music: ResourceId,
    pub bg: ResourceId,
    pub color: DiffColor,
}

/// Parameters of [`ProjectMetaManager::add_resource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewResource {
    /// Stored verbatim: no sanitizing, no collision check.
    pub name: String,
    pub kind: MediaKind,
    pub payload: Vec<u8>,
}

/// Owns the metadata of one project.
pub struct ProjectMetaManager {
    project: ProjectId,
    info: SongInfo,
    allocator: Arc<IdAllocator>,
    resources: ResourceTree,
    store: Arc<dyn BlobStore>,
}

impl ProjectMetaManager {
    /// Fresh manager with only the meta resource. Nothing is written to the
    /// store.
    pub fn new(
        project: ProjectId,
        info: SongInfo,
        store: Arc<dyn BlobStore>,
    ) -> ProjectResult<Self> {
        Self::with_allocator(project, info, store, Arc::new(IdAllocator::new()))
    }

    /// Like [`ProjectMetaManager::new`], allocating from `allocator`.
    pub fn with_allocator(
        project: ProjectId,
        info: SongInfo,
        store: Arc<dyn BlobStore>,
        allocator: Arc<IdAllocator>,
    ) -> ProjectResult<Self> {
        let meta_id = allocator.allocate(ResourceKind::Meta)?;
        let meta = ResourceRecord {
            id: meta_id,
            name: META_FILENAME.to_string(),
            kind: ResourceKind::Meta,
        };
        debug!(%project, %meta_id, "created project metadata");
        Ok(Self {
            project,
            info,
            allocator,
            resources: ResourceTree::new(meta),
            store,
        })
    }

    /// Fresh manager whose initial document is written to the store as the
    /// meta blob, so that later [`save`](Self::save) calls can overwrite it.
    pub async fn create(
        project: ProjectId,
        info: SongInfo,
        store: Arc<dyn BlobStore>,
    ) -> ProjectResult<Self> {
        let manager = Self::new(project, info, store)?;
        let meta = manager.resources.meta();
        manager
            .persist(NewBlob {
                id: meta.id,
                name: meta.name.clone(),
                project_id: project,
                kind: ResourceKind::Meta,
                payload: manager.to_json()?,
            })
            .await?;
        info!(%project, meta_id = %meta.id, "created project");
        Ok(manager)
    }

    /// Rebuild the manager from the meta blob stored for `project`.
    pub async fn load(project: ProjectId, store: Arc<dyn BlobStore>) -> ProjectResult<Self> {
        let blob = store
            .get_meta_blob(project)
            .await?
            .ok_or(ProjectError::MetaNotFound(project))?;
        debug!(%project, size = blob.size(), "loading project metadata");
        Self::from_json(project, &blob.payload, store)
    }

    /// Rebuild a manager from a document, taking its song metadata,
    /// allocation table and tree verbatim. Nothing is validated and nothing
    /// is written to the store.
    pub fn from_document(
        project: ProjectId,
        document: ProjectMetaDocument,
        store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            project,
            info: document.info,
            allocator: Arc::new(IdAllocator::from_table(document.uuids)),
            resources: document.resources,
            store,
        }
    }

    /// Decode a JSON document and rebuild from it.
    pub fn from_json(
        project: ProjectId,
        data: &[u8],
        store: Arc<dyn BlobStore>,
    ) -> ProjectResult<Self> {
        let document = ProjectMetaDocument::from_json(data)?;
        Ok(Self::from_document(project, document, store))
    }

    pub fn project(&self) -> ProjectId {
        self.project
    }

    pub fn info(&self) -> &SongInfo {
        &self.info
    }

    pub fn resources(&self) -> &ResourceTree {
        &self.resources
    }

    pub fn allocator(&self) -> &Arc<IdAllocator> {
        &self.allocator
    }

    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Id of the meta resource, under which [`save`](Self::save) writes.
    pub fn meta_id(&self) -> ResourceId {
        self.resources.meta().id
    }

    /// Add a chart and store an empty chart payload for it.
    ///
    /// The filename is the lowercased, sanitized difficulty plus `.json`,
    /// made unique against every resource in the project.
    pub async fn add_map(&mut self, map: NewMap) -> ProjectResult<ResourceId> {
        let id = self.allocator.allocate(ResourceKind::Map)?;
        let candidate = format!("{}.json", sanitize_filename(&map.difficulty.to_lowercase()));
        let name = self.resources.unique_filename(&candidate);

        self.resources.push_map(MapResource {
            id,
            name: name.clone(),
            offset: 0,
            kind: ResourceKind::Map,
            bg: map.bg,
            difficulty: map.difficulty,
            level: map.level,
            color: map.color,
            map_type: map.map_type,
            music: map.music,
            scripts: Vec::new(),
        });

        self.persist(NewBlob {
            id,
            name,
            project_id: self.project,
            kind: ResourceKind::Map,
            payload: EMPTY_MAP_PAYLOAD.to_vec(),
        })
        .await?;
        Ok(id)
    }

    /// Add an audio, image or video resource under the caller's name.
    pub async fn add_resource(&mut self, resource: NewResource) -> ProjectResult<ResourceId> {
        let kind = ResourceKind::from(resource.kind);
        let id = self.allocator.allocate(kind)?;

        self.resources.push(ResourceRecord {
            id,
            name: resource.name.clone(),
            kind,
        })?;

        self.persist(NewBlob {
            id,
            name: resource.name,
            project_id: self.project,
            kind,
            payload: resource.payload,
        })
        .await?;
        Ok(id)
    }

    /// Overwrite the meta blob with the current document. Safe to repeat.
    pub async fn save(&self) -> ProjectResult<()> {
        let id = self.meta_id();
        let payload = self.to_json()?;
        let size = payload.len();
        self.store
            .update_blob(&id, payload)
            .await
            .map_err(|source| {
                warn!(%id, error = %source, "failed to save project metadata");
                ProjectError::Persistence { id, source }
            })?;
        debug!(project = %self.project, size, "saved project metadata");
        Ok(())
    }

    /// Snapshot of the current state as a document.
    pub fn to_document(&self) -> ProjectMetaDocument {
        ProjectMetaDocument {
            info: self.info.clone(),
            uuids: self.allocator.table(),
            resources: self.resources.clone(),
        }
    }

    /// The current document encoded as JSON.
    pub fn to_json(&self) -> ProjectResult<Vec<u8>> {
        self.to_document().to_json()
    }

    /// Check the current state for dangling references and broken
    /// invariants.
    pub fn validate(&self) -> ValidationReport {
        validate(&self.to_document())
    }

    async fn persist(&self, blob: NewBlob) -> ProjectResult<()> {
        let id = blob.id;
        let kind = blob.kind;
        self.store.create_blob(blob).await.map_err(|source| {
            warn!(%id, %kind, error = %source, "resource added but not persisted");
            ProjectError::Persistence { id, source }
        })
    }
}

impl std::fmt::Debug for ProjectMetaManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectMetaManager")
            .field("project", &self.project)
            .field("name", &self.info.name)
            .field("resources", &self.resources.len())
            .field("allocated", &self.allocator.len())
            .finish()
    }
}
