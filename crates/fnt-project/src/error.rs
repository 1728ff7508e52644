//! Error types for project metadata operations.

use fnt_store::StoreError;
use fnt_types::{ProjectId, ResourceId};
use thiserror::Error;

/// Errors that can occur while managing project metadata.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The id generator kept producing identifiers that are already taken.
    /// Only reachable with a generator over a tiny identifier space.
    #[error("no free identifier after {attempts} attempts; identifier space too small")]
    AllocationExhausted { attempts: usize },

    /// A second meta resource was offered to the tree.
    #[error("project already has a meta resource")]
    MetaSingleton,

    /// A map was offered as a bare record, without its chart fields.
    #[error("map resource {0} must be added with its chart fields")]
    BareMapRecord(ResourceId),

    /// The store holds no metadata document for the project.
    #[error("no metadata document stored for {0}")]
    MetaNotFound(ProjectId),

    /// Writing a resource payload failed. The in-memory record is kept.
    #[error("failed to persist resource {id}: {source}")]
    Persistence {
        id: ResourceId,
        #[source]
        source: StoreError,
    },

    /// Any other store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The metadata document could not be encoded or decoded as JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for project operations.
pub type ProjectResult<T> = std::result::Result<T, ProjectError>;
