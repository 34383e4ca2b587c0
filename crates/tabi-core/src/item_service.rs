use chrono::{DateTime, NaiveTime, Utc};
use tabi_domain::{Entity, GeoPoint, ItemCategory, PlanItem, TripBook};
use uuid::Uuid;

use crate::{CascadeDeletion, ChangeSet, CoreError, CoreResult, StagedEdit};

/// Time a new item gets when none is chosen.
pub fn default_item_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub time: NaiveTime,
    pub category: ItemCategory,
    pub memo: Option<String>,
    pub cost: Option<f64>,
    pub photo: Option<Vec<u8>>,
    pub location: Option<GeoPoint>,
    pub address: Option<String>,
    pub url: Option<String>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time: default_item_time(),
            category: ItemCategory::default(),
            memo: None,
            cost: None,
            photo: None,
            location: None,
            address: None,
            url: None,
        }
    }

    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = time;
        self
    }

    pub fn category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    pub fn cost(mut self, cost: Option<f64>) -> Self {
        self.cost = cost;
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn from_item(item: &PlanItem) -> Self {
        Self {
            name: item.name.clone(),
            time: item.time,
            category: item.category,
            memo: item.memo.clone(),
            cost: item.cost,
            photo: item.photo.clone(),
            location: item.location,
            address: item.address.clone(),
            url: item.url.clone(),
        }
    }

    fn apply_to(&self, item: &mut PlanItem) {
        item.name = self.name.trim().to_string();
        item.time = self.time;
        item.category = self.category;
        item.memo = non_blank(self.memo.as_deref());
        item.cost = self.cost;
        item.photo = self.photo.clone().filter(|bytes| !bytes.is_empty());
        item.location = self.location;
        item.address = non_blank(self.address.as_deref());
        item.url = non_blank(self.url.as_deref());
    }
}

pub struct ItemService;

impl ItemService {
    pub fn validate(draft: &ItemDraft) -> CoreResult<()> {
        if draft.name.trim().is_empty() {
            return Err(CoreError::validation("item name must not be empty"));
        }
        if let Some(cost) = draft.cost {
            if !cost.is_finite() || cost < 0.0 {
                return Err(CoreError::validation("cost must be zero or positive"));
            }
        }
        if let Some(location) = draft.location {
            if !location.is_valid() {
                return Err(CoreError::validation(format!(
                    "coordinates {}, {} are out of range",
                    location.latitude, location.longitude
                )));
            }
        }
        Ok(())
    }

    /// Adds an item to an existing schedule.
    pub fn add(
        book: &TripBook,
        schedule_id: Uuid,
        draft: &ItemDraft,
        now: DateTime<Utc>,
    ) -> CoreResult<StagedEdit> {
        if book.schedule(schedule_id).is_none() {
            return Err(CoreError::ScheduleNotFound(schedule_id));
        }
        Self::validate(draft)?;
        let mut item = PlanItem::new(schedule_id, draft.time, draft.category, "", now);
        draft.apply_to(&mut item);
        let id = item.id;
        let mut changes = ChangeSet::new();
        changes.insert(Entity::Item(item));
        Ok(StagedEdit { id, changes })
    }

    pub fn edit(
        book: &TripBook,
        item_id: Uuid,
        draft: &ItemDraft,
        now: DateTime<Utc>,
    ) -> CoreResult<ChangeSet> {
        let mut item = book
            .item(item_id)
            .cloned()
            .ok_or(CoreError::ItemNotFound(item_id))?;
        Self::validate(draft)?;
        draft.apply_to(&mut item);
        item.touch(now);
        let mut changes = ChangeSet::new();
        changes.insert(Entity::Item(item));
        Ok(changes)
    }

    pub fn set_completed(
        book: &TripBook,
        item_id: Uuid,
        completed: bool,
        now: DateTime<Utc>,
    ) -> CoreResult<ChangeSet> {
        let mut item = book
            .item(item_id)
            .cloned()
            .ok_or(CoreError::ItemNotFound(item_id))?;
        let mut changes = ChangeSet::new();
        if item.is_completed != completed {
            item.is_completed = completed;
            item.touch(now);
            changes.insert(Entity::Item(item));
        }
        Ok(changes)
    }

    pub fn toggle(book: &TripBook, item_id: Uuid, now: DateTime<Utc>) -> CoreResult<ChangeSet> {
        let current = book
            .item(item_id)
            .map(|item| item.is_completed)
            .ok_or(CoreError::ItemNotFound(item_id))?;
        Self::set_completed(book, item_id, !current, now)
    }

    pub fn delete(book: &TripBook, item_id: Uuid) -> CoreResult<ChangeSet> {
        CascadeDeletion::item(book, item_id)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
