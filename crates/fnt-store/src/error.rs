use fnt_types::ResourceId;

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No blob is stored under this id.
    #[error("blob not found: {0}")]
    NotFound(ResourceId),

    /// A blob with this id already exists and `create_blob` refuses to
    /// overwrite it.
    #[error("blob already exists: {0}")]
    AlreadyExists(ResourceId),

    /// Header encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage backend is read-only or otherwise unavailable.
    #[error("store is read-only")]
    ReadOnly,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
