//! Integrity checks over a metadata document.
//!
//! Documents are loaded without validation, and map references to music,
//! backgrounds and scripts are plain ids. [`validate`] walks a document and
//! reports every broken invariant it finds. It never changes the document.

use std::collections::HashMap;

use fnt_types::{ResourceId, ResourceKind};

use crate::document::ProjectMetaDocument;
use crate::tree::ResourceTree;

/// Result of [`validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of records inspected, meta included.
    pub resource_count: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, id: ResourceId, kind: ViolationKind, description: String) {
        self.violations.push(Violation {
            id,
            kind,
            description,
        });
    }
}

/// A specific problem found during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// The record the problem was found on.
    pub id: ResourceId,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A record id is missing from the allocation table.
    UnallocatedId,
    /// The allocation table, the record's `type` and the list it is stored
    /// in disagree about its kind.
    KindMismatch,
    /// Two records share a name.
    DuplicateName,
    /// A map refers to a resource that does not exist or has the wrong kind.
    DanglingReference,
}

/// Check `document` for broken invariants.
pub fn validate(document: &ProjectMetaDocument) -> ValidationReport {
    let tree = &document.resources;
    let mut report = ValidationReport {
        resource_count: tree.len(),
        violations: Vec::new(),
    };
    let mut seen_names: HashMap<&str, ResourceId> = HashMap::new();

    for record in tree.iter() {
        match document.uuids.get(&record.id) {
            None => report.push(
                record.id,
                ViolationKind::UnallocatedId,
                format!("{} ({}) is not in the allocation table", record.name, record.id),
            ),
            Some(&allocated) if allocated != record.kind => report.push(
                record.id,
                ViolationKind::KindMismatch,
                format!(
                    "{} is stored as {} but was allocated as {allocated}",
                    record.name, record.kind
                ),
            ),
            Some(_) => {}
        }

        if record.declared != record.kind {
            report.push(
                record.id,
                ViolationKind::KindMismatch,
                format!(
                    "{} declares type {} but is stored as {}",
                    record.name, record.declared, record.kind
                ),
            );
        }

        if let Some(first) = seen_names.insert(record.name, record.id) {
            report.push(
                record.id,
                ViolationKind::DuplicateName,
                format!("name {:?} is also used by {first}", record.name),
            );
        }
    }

    for map in tree.maps() {
        check_reference(&mut report, tree, map.id, "music", map.music, ResourceKind::Audio);
        check_reference(&mut report, tree, map.id, "bg", map.bg, ResourceKind::Image);
        for script in &map.scripts {
            check_reference(&mut report, tree, map.id, "scripts", *script, ResourceKind::Script);
        }
    }

    report
}

fn check_reference(
    report: &mut ValidationReport,
    tree: &ResourceTree,
    from: ResourceId,
    field: &str,
    target: ResourceId,
    expected: ResourceKind,
) {
    match tree.find(&target) {
        None => report.push(
            from,
            ViolationKind::DanglingReference,
            format!("{field} refers to missing resource {target}"),
        ),
        Some(found) if found.kind != expected => report.push(
            from,
            ViolationKind::DanglingReference,
            format!(
                "{field} refers to {} ({}), expected {expected}",
                found.name, found.kind
            ),
        ),
        Some(_) => {}
    }
}
