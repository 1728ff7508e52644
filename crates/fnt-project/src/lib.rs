//! Project metadata for Fannithm.
//!
//! A project is a set of named resources (charts, audio, images, video,
//! scripts) plus one metadata document that describes all of them, itself
//! included. This crate keeps that description consistent:
//!
//! - [`IdAllocator`] hands out resource ids that are never reused, not even
//!   across a save/load cycle, because the allocation table is part of the
//!   saved document.
//! - [`names`] turns user labels into legal filenames and resolves name
//!   collisions deterministically.
//! - [`ResourceTree`] is the typed, ordered list of resource records grouped
//!   by [`ResourceKind`](fnt_types::ResourceKind).
//! - [`ProjectMetaManager`] ties them to a [`BlobStore`](fnt_store::BlobStore)
//!   and reads/writes the [`ProjectMetaDocument`].
//! - [`validate()`] checks a document for dangling references and broken
//!   invariants without changing it.
//!
//! # Modules
//!
//! - [`allocator`] — identifier generation and the allocation table
//! - [`names`] — filename legalization and uniquification
//! - [`tree`] — resource records and the [`ResourceTree`]
//! - [`document`] — the serialized [`ProjectMetaDocument`]
//! - [`manager`] — the [`ProjectMetaManager`]
//! - [`mod@validate`] — integrity checks producing a [`ValidationReport`]

pub mod allocator;
pub mod document;
pub mod error;
pub mod manager;
pub mod names;
pub mod tree;
pub mod validate;

pub use allocator::{
    AllocationTable, IdAllocator, IdGenerator, RandomIds, SeededIds, MAX_ALLOCATION_ATTEMPTS,
};
pub use document::{ProjectMetaDocument, SongInfo};
pub use error::{ProjectError, ProjectResult};
pub use manager::{NewMap, NewResource, ProjectMetaManager, META_FILENAME};
pub use names::{sanitize_filename, unique_filename};
pub use tree::{MapResource, RecordView, ResourceRecord, ResourceTree};
pub use validate::{validate, ValidationReport, Violation, ViolationKind};
