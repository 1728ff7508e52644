//! Foundation types for Fannithm projects.
//!
//! Every other `fnt-*` crate depends on `fnt-types`. It carries the
//! identifiers and closed enums that appear in the persisted project
//! metadata, so their serialized shape is part of the document format.
//!
//! # Key Types
//!
//! - [`ResourceId`] — random UUID identifying one resource within a project
//! - [`ProjectId`] — numeric key of the owning project in the blob store
//! - [`ResourceKind`] — the closed set of resource kinds (`Meta`, `Map`, ...)
//! - [`MediaKind`] — the subset of kinds accepted as uploaded media
//! - [`MapType`], [`DiffColor`] — chart format and difficulty colour tags
//!
//! All enums serialize as their integer discriminant.

#[macro_use]
mod macros;

pub mod chart;
pub mod error;
pub mod id;
pub mod kind;

pub use chart::{DiffColor, MapType};
pub use error::TypeError;
pub use id::{ProjectId, ResourceId};
pub use kind::{MediaKind, ResourceKind};
