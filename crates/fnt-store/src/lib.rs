//! Blob storage for Fannithm projects.
//!
//! Every resource of a project (charts, audio, images, video, scripts and
//! the metadata document) is persisted as an opaque payload keyed by its
//! [`ResourceId`](fnt_types::ResourceId) and tagged with the owning
//! [`ProjectId`](fnt_types::ProjectId). The project layer decides what the
//! bytes mean; the store only keeps them along with creation and update
//! timestamps.
//!
//! # Storage Backends
//!
//! All backends implement the async [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- one header and one payload file per blob in a directory
//!
//! # Design Rules
//!
//! 1. `create_blob` never overwrites: ids are allocated once by the caller.
//! 2. `update_blob` only replaces the payload of an existing blob.
//! 3. The store never interprets payloads.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod blob;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use blob::{NewBlob, StoredBlob};
pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
