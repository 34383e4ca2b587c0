use chrono::Utc;
use tabi_domain::{Entity, EntityRef, TripBook};
use tracing::{debug, warn};

use crate::{Change, ChangeSet, CoreError, CoreResult};

/// Transactional, key-indexed persistence for plans, schedules, and items.
///
/// `insert` and `delete` only stage work; nothing is durable until `save`
/// commits every staged change as one unit. After a failed `save` the staged
/// changes are still held, so callers either retry or `discard` them.
pub trait EntityStore: Send {
    /// Returns the last committed graph.
    fn load(&self) -> CoreResult<TripBook>;

    /// Stages an insert-or-replace keyed by the entity's identifier.
    fn insert(&mut self, entity: Entity);

    /// Stages a removal. Callers stage children before parents.
    fn delete(&mut self, entity: EntityRef);

    /// Commits staged changes atomically.
    fn save(&mut self) -> CoreResult<()>;

    /// Drops staged changes without committing them.
    fn discard(&mut self);

    /// Number of staged, uncommitted changes.
    fn pending(&self) -> usize;

    /// Stages every change of `changes` in order.
    fn stage(&mut self, changes: &ChangeSet) {
        for change in changes.iter() {
            match change {
                Change::Insert(entity) => self.insert(entity.clone()),
                Change::Delete(entity) => self.delete(*entity),
            }
        }
    }
}

/// Volatile store that keeps the committed graph in memory.
///
/// Saves can be forced to fail, which lets callers exercise their recovery paths.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    committed: TripBook,
    staged: ChangeSet,
    fail_saves: bool,
    commits: usize,
}

impl InMemoryStore {
    pub fn new(book: TripBook) -> Self {
        Self {
            committed: book,
            staged: ChangeSet::new(),
            fail_saves: false,
            commits: 0,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(TripBook::new(name, Utc::now()))
    }

    /// While set, every `save` fails with a persistence error.
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn committed(&self) -> &TripBook {
        &self.committed
    }
}

impl EntityStore for InMemoryStore {
    fn load(&self) -> CoreResult<TripBook> {
        Ok(self.committed.clone())
    }

    fn insert(&mut self, entity: Entity) {
        self.staged.insert(entity);
    }

    fn delete(&mut self, entity: EntityRef) {
        self.staged.delete(entity);
    }

    fn save(&mut self) -> CoreResult<()> {
        if self.fail_saves {
            warn!(pending = self.staged.len(), "in-memory store rejected save");
            return Err(CoreError::Persistence("store is not accepting writes".into()));
        }
        let mut next = self.committed.clone();
        self.staged.apply_to(&mut next);
        next.touch(Utc::now());
        self.committed = next;
        debug!(changes = self.staged.len(), "in-memory store committed");
        self.staged = ChangeSet::new();
        self.commits += 1;
        Ok(())
    }

    fn discard(&mut self) {
        self.staged = ChangeSet::new();
    }

    fn pending(&self) -> usize {
        self.staged.len()
    }
}
