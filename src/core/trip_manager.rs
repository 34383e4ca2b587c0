use std::sync::Arc;

use chrono::NaiveDate;
use tabi_core::{
    BudgetService, ChangeSet, Clock, CoreError, EntityStore, ItemDraft, ItemService,
    PlanBudgetSummary, PlanDraft, PlanService, ScheduleService, ScheduleSync,
    ScheduleSynchronizer, SystemClock, ThemeColorCodec,
};
use tabi_domain::{Plan, PlanItem, Schedule, ThemeColor, TripBook, TripFilter};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::errors::{AppError, AppResult};

/// Facade that owns the committed trip book and routes every edit through the store.
///
/// Each mutating call computes a change set against the current book, stages it,
/// and saves. The in-memory book only advances after the store accepted the save,
/// so a failed commit leaves both sides at the last committed state.
pub struct TripManager<S: EntityStore> {
    store: S,
    current: TripBook,
    clock: Arc<dyn Clock>,
}

impl<S: EntityStore> TripManager<S> {
    pub fn new(store: S) -> AppResult<Self> {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let current = store.load()?;
        Ok(Self {
            store,
            current,
            clock,
        })
    }

    pub fn book(&self) -> &TripBook {
        &self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Re-reads the committed book, dropping anything still staged.
    pub fn reload(&mut self) -> AppResult<()> {
        self.store.discard();
        self.current = self.store.load()?;
        Ok(())
    }

    /// Swaps in another store (for example after switching books).
    pub fn replace_store(&mut self, store: S) -> AppResult<S> {
        let current = store.load()?;
        self.current = current;
        Ok(std::mem::replace(&mut self.store, store))
    }

    fn commit(&mut self, changes: ChangeSet) -> AppResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut next = self.current.clone();
        changes.apply_to(&mut next);

        self.store.stage(&changes);
        if let Err(err) = self.store.save() {
            warn!(
                error = %err,
                pending = self.store.pending(),
                "save failed; staged changes discarded"
            );
            self.store.discard();
            return Err(err.into());
        }
        next.touch(self.clock.now());
        self.current = next;
        Ok(())
    }

    pub fn create_plan(&mut self, draft: &PlanDraft) -> AppResult<Uuid> {
        let staged = PlanService::create(draft, self.clock.now())?;
        self.commit(staged.changes)?;
        info!(plan_id = %staged.id, title = %draft.title.trim(), "plan created");
        Ok(staged.id)
    }

    /// Applies `draft` to an existing plan and returns the schedule reconciliation performed.
    pub fn edit_plan(&mut self, plan_id: Uuid, draft: &PlanDraft) -> AppResult<ScheduleSync> {
        let edit = PlanService::edit(&self.current, plan_id, draft, self.clock.now())?;
        self.commit(edit.changes)?;
        info!(
            %plan_id,
            created = edit.sync.created.len(),
            removed = edit.sync.to_delete.len(),
            "plan updated"
        );
        Ok(edit.sync)
    }

    /// Dry run of a date change: which days would be kept, created, or removed.
    pub fn preview_dates(
        &self,
        plan_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<ScheduleSync> {
        Ok(ScheduleSynchronizer::for_plan(
            &self.current,
            plan_id,
            start,
            end,
            self.clock.now(),
        )?)
    }

    pub fn delete_plan(&mut self, plan_id: Uuid) -> AppResult<()> {
        let changes = PlanService::delete(&self.current, plan_id)?;
        let removed = changes.len();
        self.commit(changes)?;
        info!(%plan_id, removed, "plan deleted");
        Ok(())
    }

    pub fn list_plans(&self, filter: TripFilter) -> Vec<&Plan> {
        PlanService::list(&self.current, filter, self.clock.today())
    }

    pub fn find_plan(&self, key: &str) -> AppResult<&Plan> {
        Ok(PlanService::find(&self.current, key)?)
    }

    pub fn plan(&self, plan_id: Uuid) -> AppResult<&Plan> {
        self.current
            .plan(plan_id)
            .ok_or_else(|| CoreError::PlanNotFound(plan_id).into())
    }

    pub fn schedules(&self, plan_id: Uuid) -> Vec<&Schedule> {
        self.current.schedules_for(plan_id)
    }

    /// The `day`-th schedule (1-based) of a plan in date order.
    pub fn schedule_by_day(&self, plan_id: Uuid, day: usize) -> AppResult<&Schedule> {
        let schedules = self.current.schedules_for(plan_id);
        day.checked_sub(1)
            .and_then(|index| schedules.get(index).copied())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "day {day} does not exist; the plan has {} day(s)",
                    schedules.len()
                ))
            })
    }

    pub fn items(&self, schedule_id: Uuid) -> Vec<&PlanItem> {
        self.current.items_for(schedule_id)
    }

    pub fn update_schedule(
        &mut self,
        schedule_id: Uuid,
        title: Option<&str>,
        notes: Option<&str>,
    ) -> AppResult<()> {
        let changes = ScheduleService::update_details(
            &self.current,
            schedule_id,
            title,
            notes,
            self.clock.now(),
        )?;
        self.commit(changes)?;
        info!(%schedule_id, "day updated");
        Ok(())
    }

    pub fn delete_schedule(&mut self, schedule_id: Uuid) -> AppResult<()> {
        let changes = ScheduleService::delete(&self.current, schedule_id)?;
        self.commit(changes)?;
        info!(%schedule_id, "day deleted");
        Ok(())
    }

    pub fn add_item(&mut self, schedule_id: Uuid, draft: &ItemDraft) -> AppResult<Uuid> {
        let staged = ItemService::add(&self.current, schedule_id, draft, self.clock.now())?;
        self.commit(staged.changes)?;
        info!(item_id = %staged.id, %schedule_id, "item added");
        Ok(staged.id)
    }

    pub fn edit_item(&mut self, item_id: Uuid, draft: &ItemDraft) -> AppResult<()> {
        let changes = ItemService::edit(&self.current, item_id, draft, self.clock.now())?;
        self.commit(changes)?;
        info!(%item_id, "item updated");
        Ok(())
    }

    /// Flips an item's completion flag and returns the new value.
    pub fn toggle_item(&mut self, item_id: Uuid) -> AppResult<bool> {
        let changes = ItemService::toggle(&self.current, item_id, self.clock.now())?;
        self.commit(changes)?;
        let completed = self
            .current
            .item(item_id)
            .map(|item| item.is_completed)
            .unwrap_or_default();
        info!(%item_id, completed, "item toggled");
        Ok(completed)
    }

    pub fn delete_item(&mut self, item_id: Uuid) -> AppResult<()> {
        let changes = ItemService::delete(&self.current, item_id)?;
        self.commit(changes)?;
        info!(%item_id, "item deleted");
        Ok(())
    }

    pub fn budget_summary(&self, plan_id: Uuid) -> AppResult<PlanBudgetSummary> {
        let plan = self.plan(plan_id)?;
        Ok(BudgetService::summarize(&self.current, plan))
    }

    pub fn plan_color(&self, plan_id: Uuid) -> AppResult<ThemeColor> {
        Ok(ThemeColorCodec::resolve(self.plan(plan_id)?))
    }
}
