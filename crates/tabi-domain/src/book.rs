//! The persisted entity graph: every plan, schedule, and item a user owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Entity, EntityRef, Plan, PlanItem, Schedule};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Flat, identifier-keyed storage of the Plan → Schedule → PlanItem tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripBook {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub items: Vec<PlanItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "TripBook::schema_version_default")]
    pub schema_version: u8,
}

impl TripBook {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            plans: Vec::new(),
            schedules: Vec::new(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn plan(&self, id: Uuid) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == id)
    }

    pub fn schedule(&self, id: Uuid) -> Option<&Schedule> {
        self.schedules.iter().find(|schedule| schedule.id == id)
    }

    pub fn item(&self, id: Uuid) -> Option<&PlanItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Schedules owned by `plan_id`, earliest date first.
    pub fn schedules_for(&self, plan_id: Uuid) -> Vec<&Schedule> {
        let mut schedules: Vec<&Schedule> = self
            .schedules
            .iter()
            .filter(|schedule| schedule.plan_id == plan_id)
            .collect();
        schedules.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        schedules
    }

    /// Items owned by `schedule_id`, ordered by time of day.
    pub fn items_for(&self, schedule_id: Uuid) -> Vec<&PlanItem> {
        let mut items: Vec<&PlanItem> = self
            .items
            .iter()
            .filter(|item| item.schedule_id == schedule_id)
            .collect();
        items.sort_by(|a, b| a.time.cmp(&b.time).then(a.created_at.cmp(&b.created_at)));
        items
    }

    /// Every item under every schedule of `plan_id`.
    pub fn items_for_plan(&self, plan_id: Uuid) -> Vec<&PlanItem> {
        self.schedules_for(plan_id)
            .into_iter()
            .flat_map(|schedule| self.items_for(schedule.id))
            .collect()
    }

    /// Inserts the entity, replacing any record with the same identifier.
    pub fn upsert(&mut self, entity: Entity) {
        match entity {
            Entity::Plan(plan) => upsert_by_id(&mut self.plans, plan, |p| p.id),
            Entity::Schedule(schedule) => upsert_by_id(&mut self.schedules, schedule, |s| s.id),
            Entity::Item(item) => upsert_by_id(&mut self.items, item, |i| i.id),
        }
    }

    /// Removes a single record without touching its children. Returns `true` when found.
    pub fn remove(&mut self, entity: EntityRef) -> bool {
        match entity {
            EntityRef::Plan(id) => remove_by_id(&mut self.plans, id, |p| p.id),
            EntityRef::Schedule(id) => remove_by_id(&mut self.schedules, id, |s| s.id),
            EntityRef::Item(id) => remove_by_id(&mut self.items, id, |i| i.id),
        }
    }

    /// Child records whose parent no longer exists.
    pub fn orphans(&self) -> Vec<EntityRef> {
        let mut orphans: Vec<EntityRef> = self
            .schedules
            .iter()
            .filter(|schedule| self.plan(schedule.plan_id).is_none())
            .map(|schedule| EntityRef::Schedule(schedule.id))
            .collect();
        orphans.extend(
            self.items
                .iter()
                .filter(|item| self.schedule(item.schedule_id).is_none())
                .map(|item| EntityRef::Item(item.id)),
        );
        orphans
    }
}

fn upsert_by_id<T>(records: &mut Vec<T>, record: T, id_of: impl Fn(&T) -> Uuid) {
    let id = id_of(&record);
    match records.iter().position(|existing| id_of(existing) == id) {
        Some(index) => records[index] = record,
        None => records.push(record),
    }
}

fn remove_by_id<T>(records: &mut Vec<T>, id: Uuid, id_of: impl Fn(&T) -> Uuid) -> bool {
    let before = records.len();
    records.retain(|record| id_of(record) != id);
    records.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemCategory;
    use chrono::{NaiveDate, NaiveTime};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn lookups_are_sorted() {
        let now = Utc::now();
        let mut book = TripBook::new("Trips", now);
        let plan = Plan::new("Kyoto", date(1), date(2), now);
        let late = Schedule::new(plan.id, date(2), now);
        let early = Schedule::new(plan.id, date(1), now);
        let dinner = PlanItem::new(early.id, time(19), ItemCategory::Meal, "Dinner", now);
        let breakfast = PlanItem::new(early.id, time(8), ItemCategory::Meal, "Breakfast", now);
        let plan_id = plan.id;
        let early_id = early.id;
        book.upsert(Entity::Plan(plan));
        book.upsert(Entity::Schedule(late));
        book.upsert(Entity::Schedule(early));
        book.upsert(Entity::Item(dinner));
        book.upsert(Entity::Item(breakfast));

        let dates: Vec<_> = book.schedules_for(plan_id).iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(1), date(2)]);
        let names: Vec<_> = book.items_for(early_id).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Breakfast", "Dinner"]);
        assert_eq!(book.items_for_plan(plan_id).len(), 2);
    }

    #[test]
    fn upsert_replaces_and_remove_reports_orphans() {
        let now = Utc::now();
        let mut book = TripBook::new("Trips", now);
        let mut plan = Plan::new("Nara", date(1), date(1), now);
        let schedule = Schedule::new(plan.id, date(1), now);
        book.upsert(Entity::Plan(plan.clone()));
        book.upsert(Entity::Schedule(schedule.clone()));

        plan.title = "Nara & Uji".into();
        book.upsert(Entity::Plan(plan.clone()));
        assert_eq!(book.plans.len(), 1);
        assert_eq!(book.plan(plan.id).unwrap().title, "Nara & Uji");

        assert!(book.remove(EntityRef::Plan(plan.id)));
        assert!(!book.remove(EntityRef::Plan(plan.id)));
        assert_eq!(book.orphans(), vec![EntityRef::Schedule(schedule.id)]);
    }
}
