//! Keeps a plan's per-day schedules aligned with its date range.
//!
//! Reconciliation is positional: existing schedules are sorted by date and
//! matched to day slots in order, so a schedule keeps its items, title, and
//! notes when the range moves. Only the count difference is created or
//! deleted, always at the tail of the trip.

use chrono::{DateTime, NaiveDate, Utc};
use tabi_domain::{inclusive_day_count, nth_day, Entity, Schedule, TripBook};
use tracing::debug;
use uuid::Uuid;

use crate::{CascadeDeletion, ChangeSet, CoreError, CoreResult};

/// Result of reconciling a plan's schedules against a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSync {
    /// Pre-existing schedules that survive, ordered and re-dated.
    pub kept: Vec<Schedule>,
    /// Newly created, empty schedules appended after `kept`.
    pub created: Vec<Schedule>,
    /// Trailing schedules that no longer fit the range; their items go with them.
    pub to_delete: Vec<Schedule>,
    /// Ids of kept schedules whose date was re-stamped.
    pub restamped: Vec<Uuid>,
}

impl ScheduleSync {
    /// The plan's full schedule sequence after reconciliation.
    pub fn ordered(&self) -> impl Iterator<Item = &Schedule> {
        self.kept.iter().chain(self.created.iter())
    }

    pub fn day_count(&self) -> usize {
        self.kept.len() + self.created.len()
    }

    /// True when applying the result would not change anything.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.to_delete.is_empty() && self.restamped.is_empty()
    }
}

pub struct ScheduleSynchronizer;

impl ScheduleSynchronizer {
    /// Reconciles `current` against `[start, end]`.
    ///
    /// Fails with a validation error, and produces nothing, when `end` precedes `start`.
    pub fn synchronize<'a>(
        plan_id: Uuid,
        current: impl IntoIterator<Item = &'a Schedule>,
        start: NaiveDate,
        end: NaiveDate,
        now: DateTime<Utc>,
    ) -> CoreResult<ScheduleSync> {
        if end < start {
            return Err(CoreError::validation(format!(
                "end date {end} is before start date {start}"
            )));
        }
        let desired = inclusive_day_count(start, end);

        let mut kept: Vec<Schedule> = current.into_iter().cloned().collect();
        kept.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        let current_count = kept.len();

        let to_delete = if desired < current_count {
            kept.split_off(desired)
        } else {
            Vec::new()
        };

        let mut created = Vec::new();
        if desired > current_count {
            let first_new = kept
                .last()
                .map(|last| nth_day(last.date, 1))
                .unwrap_or(start);
            for (offset, ordinal) in (current_count..desired).enumerate() {
                let schedule = Schedule::new(plan_id, nth_day(first_new, offset), now)
                    .with_title(Schedule::day_title(ordinal + 1));
                created.push(schedule);
            }
        }

        let mut restamped = Vec::new();
        for (index, schedule) in kept.iter_mut().enumerate() {
            let target = nth_day(start, index);
            if schedule.date != target {
                schedule.date = target;
                schedule.touch(now);
                restamped.push(schedule.id);
            }
        }
        let kept_len = kept.len();
        for (offset, schedule) in created.iter_mut().enumerate() {
            schedule.date = nth_day(start, kept_len + offset);
        }

        debug!(
            %plan_id,
            desired,
            current = current_count,
            created = created.len(),
            deleted = to_delete.len(),
            restamped = restamped.len(),
            "schedules reconciled"
        );

        Ok(ScheduleSync {
            kept,
            created,
            to_delete,
            restamped,
        })
    }

    /// Reconciles the schedules `book` currently holds for `plan_id`.
    pub fn for_plan(
        book: &TripBook,
        plan_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        now: DateTime<Utc>,
    ) -> CoreResult<ScheduleSync> {
        if book.plan(plan_id).is_none() {
            return Err(CoreError::PlanNotFound(plan_id));
        }
        Self::synchronize(plan_id, book.schedules_for(plan_id), start, end, now)
    }

    /// Turns a reconciliation into store operations: re-dated and new schedules
    /// are inserted, dropped schedules are cascade-deleted with their items.
    pub fn to_changes(book: &TripBook, sync: &ScheduleSync) -> ChangeSet {
        let mut changes = ChangeSet::new();
        for schedule in &sync.to_delete {
            changes.extend(CascadeDeletion::schedule_subtree(book, schedule.id));
        }
        for schedule in sync
            .kept
            .iter()
            .filter(|schedule| sync.restamped.contains(&schedule.id))
        {
            changes.insert(Entity::Schedule(schedule.clone()));
        }
        for schedule in &sync.created {
            changes.insert(Entity::Schedule(schedule.clone()));
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    fn existing(plan_id: Uuid, days: &[u32]) -> Vec<Schedule> {
        let now = Utc::now();
        days.iter()
            .enumerate()
            .map(|(idx, d)| {
                Schedule::new(plan_id, date(*d), now).with_title(format!("Custom {}", idx + 1))
            })
            .collect()
    }

    #[test]
    fn rejects_inverted_range() {
        let err = ScheduleSynchronizer::synchronize(
            Uuid::new_v4(),
            std::iter::empty(),
            date(5),
            date(4),
            Utc::now(),
        )
        .expect_err("inverted range");
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn creation_titles_every_day() {
        let plan_id = Uuid::new_v4();
        let sync = ScheduleSynchronizer::synchronize(
            plan_id,
            std::iter::empty(),
            date(1),
            date(3),
            Utc::now(),
        )
        .unwrap();
        let titles: Vec<_> = sync.ordered().map(|s| s.title.clone().unwrap()).collect();
        assert_eq!(titles, vec!["Day 1", "Day 2", "Day 3"]);
        assert!(sync.ordered().all(|s| s.plan_id == plan_id));
    }

    #[test]
    fn unsorted_input_is_matched_by_date() {
        let plan_id = Uuid::new_v4();
        let mut current = existing(plan_id, &[1, 2, 3]);
        current.reverse();
        let sync =
            ScheduleSynchronizer::synchronize(plan_id, &current, date(10), date(11), Utc::now())
                .unwrap();
        let titles: Vec<_> = sync.kept.iter().map(|s| s.title.clone().unwrap()).collect();
        assert_eq!(titles, vec!["Custom 1", "Custom 2"]);
        assert_eq!(sync.to_delete[0].title.as_deref(), Some("Custom 3"));
        assert_eq!(sync.restamped.len(), 2);
    }

    #[test]
    fn shifting_range_restamps_but_keeps_titles() {
        let plan_id = Uuid::new_v4();
        let current = existing(plan_id, &[1, 2]);
        let sync =
            ScheduleSynchronizer::synchronize(plan_id, &current, date(20), date(22), Utc::now())
                .unwrap();
        let dates: Vec<_> = sync.ordered().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(20), date(21), date(22)]);
        assert_eq!(sync.kept[0].title.as_deref(), Some("Custom 1"));
        assert_eq!(sync.created[0].title.as_deref(), Some("Day 3"));
    }
}
