//! Identifier allocation.
//!
//! The [`IdAllocator`] owns the project's allocation table: every id ever
//! handed out, mapped to the kind of resource it was allocated for. Entries
//! are never removed, and the table is saved with the metadata document, so
//! an allocator rebuilt with [`IdAllocator::from_table`] cannot reissue an
//! id that was allocated before the save.

use std::collections::BTreeMap;
use std::sync::Mutex;

use fnt_types::{ResourceId, ResourceKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::{ProjectError, ProjectResult};

/// Upper bound on generator draws for a single allocation.
///
/// With 122 random bits per UUID a second draw is already practically never
/// needed; hitting the bound means the generator is broken or its space is
/// too small.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 64;

/// Ordered map of allocated ids to the kind they were allocated for.
pub type AllocationTable = BTreeMap<ResourceId, ResourceKind>;

/// Source of candidate identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> ResourceId;
}

/// Random UUID v4 identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&self) -> ResourceId {
        ResourceId::random()
    }
}

/// Reproducible UUID v4 identifiers drawn from a seeded RNG.
///
/// Two generators with the same seed yield the same sequence.
#[derive(Debug)]
pub struct SeededIds {
    rng: Mutex<StdRng>,
}

impl SeededIds {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IdGenerator for SeededIds {
    fn generate(&self) -> ResourceId {
        let mut bytes = [0u8; 16];
        self.rng.lock().expect("lock poisoned").fill(&mut bytes);
        ResourceId::from_uuid(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

/// Allocates project-unique resource ids and records their kinds.
///
/// The collision check and the table insert happen under one lock, so
/// concurrent callers sharing an allocator through an `Arc` never receive
/// the same id.
pub struct IdAllocator {
    table: Mutex<AllocationTable>,
    generator: Box<dyn IdGenerator>,
}

impl IdAllocator {
    /// Empty allocator drawing random UUIDs.
    pub fn new() -> Self {
        Self::from_table(AllocationTable::new())
    }

    /// Empty allocator drawing from `generator`.
    pub fn with_generator(generator: impl IdGenerator + 'static) -> Self {
        Self::from_table_with_generator(AllocationTable::new(), generator)
    }

    /// Allocator continuing from a previously saved table.
    pub fn from_table(table: AllocationTable) -> Self {
        Self::from_table_with_generator(table, RandomIds)
    }

    pub fn from_table_with_generator(
        table: AllocationTable,
        generator: impl IdGenerator + 'static,
    ) -> Self {
        Self {
            table: Mutex::new(table),
            generator: Box::new(generator),
        }
    }

    /// Allocate a fresh id for a resource of `kind`.
    ///
    /// Draws candidates until one is absent from the table. Gives up with
    /// [`ProjectError::AllocationExhausted`] after
    /// [`MAX_ALLOCATION_ATTEMPTS`] draws.
    pub fn allocate(&self, kind: ResourceKind) -> ProjectResult<ResourceId> {
        let mut table = self.table.lock().expect("lock poisoned");
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let id = self.generator.generate();
            if table.contains_key(&id) {
                debug!(%id, attempt, "identifier collision, retrying");
                continue;
            }
            table.insert(id, kind);
            debug!(%id, %kind, "allocated identifier");
            return Ok(id);
        }
        warn!(%kind, attempts = MAX_ALLOCATION_ATTEMPTS, "identifier allocation exhausted");
        Err(ProjectError::AllocationExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// Kind an id was allocated for, if it was allocated at all.
    pub fn kind_of(&self, id: &ResourceId) -> Option<ResourceKind> {
        self.table.lock().expect("lock poisoned").get(id).copied()
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.table.lock().expect("lock poisoned").contains_key(id)
    }

    /// Number of ids allocated so far.
    pub fn len(&self) -> usize {
        self.table.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.lock().expect("lock poisoned").is_empty()
    }

    /// Snapshot of the allocation table.
    pub fn table(&self) -> AllocationTable {
        self.table.lock().expect("lock poisoned").clone()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdAllocator")
            .field("allocated", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};
    use std::sync::Arc;
    use std::thread;

    use proptest::prelude::*;

    use super::*;

    /// Replays a fixed list of ids, then repeats the last one forever.
    struct ScriptedIds {
        queue: Mutex<VecDeque<ResourceId>>,
        last: ResourceId,
    }

    impl ScriptedIds {
        fn new(ids: Vec<ResourceId>) -> Self {
            let last = *ids.last().expect("non-empty script");
            Self {
                queue: Mutex::new(ids.into()),
                last,
            }
        }
    }

    impl IdGenerator for ScriptedIds {
        fn generate(&self) -> ResourceId {
            self.queue.lock().unwrap().pop_front().unwrap_or(self.last)
        }
    }

    #[test]
    fn allocate_records_kind() {
        let allocator = IdAllocator::new();
        let id = allocator.allocate(ResourceKind::Audio).unwrap();
        assert_eq!(allocator.kind_of(&id), Some(ResourceKind::Audio));
        assert!(allocator.contains(&id));
        assert_eq!(allocator.len(), 1);
    }

    #[test]
    fn unknown_id_has_no_kind() {
        let allocator = IdAllocator::new();
        assert!(allocator.is_empty());
        assert_eq!(allocator.kind_of(&ResourceId::random()), None);
    }

    #[test]
    fn collision_is_retried() {
        let a = ResourceId::random();
        let b = ResourceId::random();
        let allocator = IdAllocator::with_generator(ScriptedIds::new(vec![a, a, a, b]));

        assert_eq!(allocator.allocate(ResourceKind::Map).unwrap(), a);
        assert_eq!(allocator.allocate(ResourceKind::Image).unwrap(), b);
        assert_eq!(allocator.kind_of(&a), Some(ResourceKind::Map));
        assert_eq!(allocator.kind_of(&b), Some(ResourceKind::Image));
    }

    #[test]
    fn exhausted_generator_is_reported() {
        let a = ResourceId::random();
        let allocator = IdAllocator::with_generator(ScriptedIds::new(vec![a]));
        allocator.allocate(ResourceKind::Meta).unwrap();

        let err = allocator.allocate(ResourceKind::Map).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::AllocationExhausted { attempts } if attempts == MAX_ALLOCATION_ATTEMPTS
        ));
        assert_eq!(allocator.len(), 1);
    }

    #[test]
    fn seeded_generators_repeat() {
        let first = SeededIds::new(42);
        let second = SeededIds::new(42);
        for _ in 0..5 {
            assert_eq!(first.generate(), second.generate());
        }
        assert_ne!(SeededIds::new(1).generate(), SeededIds::new(2).generate());
    }

    #[test]
    fn seeded_ids_are_v4() {
        let id = SeededIds::new(7).generate();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn restored_table_blocks_replayed_ids() {
        // Same seed: the generator replays every id the first allocator
        // issued, and the restored table must reject all of them.
        let original = IdAllocator::with_generator(SeededIds::new(9));
        let issued: Vec<_> = (0..10)
            .map(|_| original.allocate(ResourceKind::Map).unwrap())
            .collect();

        let restored = IdAllocator::from_table_with_generator(original.table(), SeededIds::new(9));
        let fresh = restored.allocate(ResourceKind::Audio).unwrap();
        assert!(!issued.contains(&fresh));
        assert_eq!(restored.len(), 11);
    }

    #[test]
    fn concurrent_allocations_are_unique() {
        let allocator = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                thread::spawn(move || {
                    (0..50)
                        .map(|_| allocator.allocate(ResourceKind::Script).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("thread should not panic") {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(allocator.len(), 400);
    }

    proptest! {
        #[test]
        fn allocations_never_repeat(seed in any::<u64>(), before in 1usize..20, after in 1usize..20) {
            let original = IdAllocator::with_generator(SeededIds::new(seed));
            let mut seen = HashSet::new();
            for _ in 0..before {
                prop_assert!(seen.insert(original.allocate(ResourceKind::Map).unwrap()));
            }

            let restored = IdAllocator::from_table_with_generator(original.table(), SeededIds::new(seed));
            for _ in 0..after {
                prop_assert!(seen.insert(restored.allocate(ResourceKind::Image).unwrap()));
            }
            prop_assert_eq!(restored.len(), before + after);
        }
    }
}
