//! Ordered deltas produced by the services and replayed against a store.

use tabi_domain::{Entity, EntityRef, TripBook};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Insert(Entity),
    Delete(EntityRef),
}

/// A logical edit: inserts (insert-or-replace) and deletes in application order.
/// Deletes are always emitted child-before-parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity) {
        self.changes.push(Change::Insert(entity));
    }

    pub fn delete(&mut self, entity: EntityRef) {
        self.changes.push(Change::Delete(entity));
    }

    pub fn extend(&mut self, other: ChangeSet) {
        self.changes.extend(other.changes);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    pub fn inserts(&self) -> impl Iterator<Item = &Entity> {
        self.changes.iter().filter_map(|change| match change {
            Change::Insert(entity) => Some(entity),
            Change::Delete(_) => None,
        })
    }

    pub fn deletes(&self) -> impl Iterator<Item = EntityRef> + '_ {
        self.changes.iter().filter_map(|change| match change {
            Change::Insert(_) => None,
            Change::Delete(entity) => Some(*entity),
        })
    }

    /// Replays every change, in order, onto `book`.
    pub fn apply_to(&self, book: &mut TripBook) {
        for change in &self.changes {
            match change {
                Change::Insert(entity) => book.upsert(entity.clone()),
                Change::Delete(entity) => {
                    book.remove(*entity);
                }
            }
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// A change set together with the identifier of the entity it centres on.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedEdit {
    pub id: Uuid,
    pub changes: ChangeSet,
}
