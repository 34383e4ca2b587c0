use chrono::{DateTime, Utc};
use tabi_domain::{Entity, TripBook};
use uuid::Uuid;

use crate::{CascadeDeletion, ChangeSet, CoreError, CoreResult};

pub struct ScheduleService;

impl ScheduleService {
    /// Sets a day's title and notes. Blank values clear the field.
    pub fn update_details(
        book: &TripBook,
        schedule_id: Uuid,
        title: Option<&str>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> CoreResult<ChangeSet> {
        let mut schedule = book
            .schedule(schedule_id)
            .cloned()
            .ok_or(CoreError::ScheduleNotFound(schedule_id))?;
        schedule.title = normalize(title);
        schedule.notes = normalize(notes);
        schedule.touch(now);

        let mut changes = ChangeSet::new();
        changes.insert(Entity::Schedule(schedule));
        Ok(changes)
    }

    /// Removes a day and its items. The plan's range is left as is; the next
    /// date edit reconciles the day count again.
    pub fn delete(book: &TripBook, schedule_id: Uuid) -> CoreResult<ChangeSet> {
        CascadeDeletion::schedule(book, schedule_id)
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
