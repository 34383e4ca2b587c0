//! Explicit depth-first deletion over the trip graph.
//!
//! Every delete is emitted child-before-parent, so replaying a change set in
//! order never leaves an item whose schedule is gone or a schedule whose plan
//! is gone.

use tabi_domain::{EntityRef, TripBook};
use tracing::debug;
use uuid::Uuid;

use crate::{ChangeSet, CoreError, CoreResult};

pub struct CascadeDeletion;

impl CascadeDeletion {
    /// Deletes a plan, each of its schedules, and each schedule's items.
    pub fn plan(book: &TripBook, plan_id: Uuid) -> CoreResult<ChangeSet> {
        if book.plan(plan_id).is_none() {
            return Err(CoreError::PlanNotFound(plan_id));
        }
        let mut changes = ChangeSet::new();
        for schedule in book.schedules_for(plan_id) {
            changes.extend(Self::schedule_subtree(book, schedule.id));
        }
        changes.delete(EntityRef::Plan(plan_id));
        debug!(%plan_id, deletes = changes.len(), "plan cascade planned");
        Ok(changes)
    }

    /// Deletes a schedule after its items.
    pub fn schedule(book: &TripBook, schedule_id: Uuid) -> CoreResult<ChangeSet> {
        if book.schedule(schedule_id).is_none() {
            return Err(CoreError::ScheduleNotFound(schedule_id));
        }
        Ok(Self::schedule_subtree(book, schedule_id))
    }

    /// Deletes one item. Items own nothing, so there is nothing to cascade.
    pub fn item(book: &TripBook, item_id: Uuid) -> CoreResult<ChangeSet> {
        if book.item(item_id).is_none() {
            return Err(CoreError::ItemNotFound(item_id));
        }
        let mut changes = ChangeSet::new();
        changes.delete(EntityRef::Item(item_id));
        Ok(changes)
    }

    /// Deletes for a schedule subtree without checking the schedule exists.
    pub(crate) fn schedule_subtree(book: &TripBook, schedule_id: Uuid) -> ChangeSet {
        let mut changes = ChangeSet::new();
        for item in book.items_for(schedule_id) {
            changes.delete(EntityRef::Item(item.id));
        }
        changes.delete(EntityRef::Schedule(schedule_id));
        changes
    }
}
