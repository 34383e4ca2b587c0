//! Type-erased handles over the three stored entity kinds.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::short_id;
use crate::{Plan, PlanItem, Schedule};

/// A full entity record, as handed to a store for insertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Entity {
    Plan(Plan),
    Schedule(Schedule),
    Item(PlanItem),
}

impl Entity {
    pub fn entity_ref(&self) -> EntityRef {
        match self {
            Entity::Plan(plan) => EntityRef::Plan(plan.id),
            Entity::Schedule(schedule) => EntityRef::Schedule(schedule.id),
            Entity::Item(item) => EntityRef::Item(item.id),
        }
    }
}

/// Identifies a stored entity without carrying its data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Plan(Uuid),
    Schedule(Uuid),
    Item(Uuid),
}

impl EntityRef {
    pub fn id(self) -> Uuid {
        match self {
            EntityRef::Plan(id) | EntityRef::Schedule(id) | EntityRef::Item(id) => id,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            EntityRef::Plan(_) => "plan",
            EntityRef::Schedule(_) => "schedule",
            EntityRef::Item(_) => "item",
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), short_id(self.id()))
    }
}
