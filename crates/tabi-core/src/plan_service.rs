use chrono::{DateTime, NaiveDate, Utc};
use tabi_domain::{Entity, Plan, ThemeColor, TripBook, TripFilter, DEFAULT_THEME_NAME};
use tracing::debug;
use uuid::Uuid;

use crate::{
    CascadeDeletion, ChangeSet, CoreError, CoreResult, ScheduleSync, ScheduleSynchronizer,
    StagedEdit, ThemeColorCodec,
};

/// User-editable plan fields, validated before any change is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDraft {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub theme_name: String,
    /// Custom accent; `None` uses the theme preset.
    pub theme_color: Option<ThemeColor>,
    pub budget: Option<f64>,
    pub memo: Option<String>,
    pub time_zone: Option<String>,
}

impl PlanDraft {
    pub fn new(title: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            start_date,
            end_date,
            theme_name: DEFAULT_THEME_NAME.into(),
            theme_color: None,
            budget: None,
            memo: None,
            time_zone: None,
        }
    }

    pub fn with_theme(mut self, name: impl Into<String>) -> Self {
        self.theme_name = name.into();
        self
    }

    pub fn with_color(mut self, color: ThemeColor) -> Self {
        self.theme_color = Some(color);
        self
    }

    pub fn with_budget(mut self, budget: Option<f64>) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// Starts an edit from a stored plan. An unreadable color blob becomes `None`.
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            title: plan.title.clone(),
            start_date: plan.start_date,
            end_date: plan.end_date,
            theme_name: plan.theme_name.clone(),
            theme_color: plan
                .theme_color
                .as_deref()
                .and_then(|blob| ThemeColorCodec::try_decode(blob).ok()),
            budget: plan.budget,
            memo: plan.memo.clone(),
            time_zone: Some(plan.time_zone.clone()),
        }
    }

    fn apply_to(&self, plan: &mut Plan) {
        plan.title = self.title.trim().to_string();
        plan.start_date = self.start_date;
        plan.end_date = self.end_date;
        plan.theme_name = if self.theme_name.trim().is_empty() {
            DEFAULT_THEME_NAME.into()
        } else {
            self.theme_name.trim().to_string()
        };
        plan.theme_color = self.theme_color.map(ThemeColorCodec::encode);
        plan.budget = self.budget;
        plan.memo = self
            .memo
            .as_deref()
            .map(str::trim)
            .filter(|memo| !memo.is_empty())
            .map(str::to_string);
        if let Some(time_zone) = self.time_zone.as_deref().map(str::trim) {
            if !time_zone.is_empty() {
                plan.time_zone = time_zone.to_string();
            }
        }
    }
}

/// Outcome of a plan edit: the reconciliation plus the store operations for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEdit {
    pub plan_id: Uuid,
    pub sync: ScheduleSync,
    pub changes: ChangeSet,
}

pub struct PlanService;

impl PlanService {
    pub fn validate(draft: &PlanDraft) -> CoreResult<()> {
        if draft.title.trim().is_empty() {
            return Err(CoreError::validation("plan title must not be empty"));
        }
        if draft.end_date < draft.start_date {
            return Err(CoreError::validation(format!(
                "end date {} is before start date {}",
                draft.end_date, draft.start_date
            )));
        }
        if let Some(budget) = draft.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(CoreError::validation("budget must be zero or positive"));
            }
        }
        Ok(())
    }

    /// Creates a plan together with one schedule per day of its range.
    pub fn create(draft: &PlanDraft, now: DateTime<Utc>) -> CoreResult<StagedEdit> {
        Self::validate(draft)?;
        let mut plan = Plan::new(draft.title.trim(), draft.start_date, draft.end_date, now);
        draft.apply_to(&mut plan);

        let sync = ScheduleSynchronizer::synchronize(
            plan.id,
            std::iter::empty(),
            plan.start_date,
            plan.end_date,
            now,
        )?;
        let mut changes = ChangeSet::new();
        let plan_id = plan.id;
        changes.insert(Entity::Plan(plan));
        for schedule in sync.created {
            changes.insert(Entity::Schedule(schedule));
        }
        debug!(%plan_id, changes = changes.len(), "plan creation staged");
        Ok(StagedEdit {
            id: plan_id,
            changes,
        })
    }

    /// Updates a plan's fields and reconciles its schedules with the new range.
    pub fn edit(
        book: &TripBook,
        plan_id: Uuid,
        draft: &PlanDraft,
        now: DateTime<Utc>,
    ) -> CoreResult<PlanEdit> {
        let existing = book.plan(plan_id).ok_or(CoreError::PlanNotFound(plan_id))?;
        Self::validate(draft)?;

        let mut plan = existing.clone();
        draft.apply_to(&mut plan);
        plan.touch(now);

        let sync =
            ScheduleSynchronizer::for_plan(book, plan_id, plan.start_date, plan.end_date, now)?;
        let mut changes = ScheduleSynchronizer::to_changes(book, &sync);
        changes.insert(Entity::Plan(plan));
        debug!(%plan_id, changes = changes.len(), "plan edit staged");
        Ok(PlanEdit {
            plan_id,
            sync,
            changes,
        })
    }

    pub fn delete(book: &TripBook, plan_id: Uuid) -> CoreResult<ChangeSet> {
        CascadeDeletion::plan(book, plan_id)
    }

    /// Plans matching `filter` relative to `today`, newest created first.
    pub fn list(book: &TripBook, filter: TripFilter, today: NaiveDate) -> Vec<&Plan> {
        let mut plans: Vec<&Plan> = book
            .plans
            .iter()
            .filter(|plan| filter.matches(plan.end_date, today))
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        plans
    }

    /// Resolves a plan from a full identifier or an unambiguous id prefix.
    pub fn find<'a>(book: &'a TripBook, key: &str) -> CoreResult<&'a Plan> {
        let key = key.trim().to_ascii_lowercase();
        if let Ok(id) = Uuid::parse_str(&key) {
            return book.plan(id).ok_or(CoreError::PlanNotFound(id));
        }
        let matches: Vec<&Plan> = book
            .plans
            .iter()
            .filter(|plan| !key.is_empty() && plan.id.simple().to_string().starts_with(&key))
            .collect();
        match matches.as_slice() {
            [plan] => Ok(plan),
            [] => Err(CoreError::validation(format!("no plan matches `{key}`"))),
            _ => Err(CoreError::validation(format!(
                "`{key}` matches {} plans; use a longer id",
                matches.len()
            ))),
        }
    }
}
