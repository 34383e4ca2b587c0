use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabi_domain::{ItemCategory, Plan, TripBook};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetStatus {
    /// No budget set for the plan.
    Unbudgeted,
    UnderBudget,
    OnTrack,
    OverBudget,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyTotal {
    pub schedule_id: Uuid,
    pub date: NaiveDate,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: ItemCategory,
    pub total: f64,
    pub items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanBudgetSummary {
    pub plan_id: Uuid,
    pub budget: Option<f64>,
    pub used: f64,
    pub remaining: Option<f64>,
    pub percent_used: Option<f64>,
    pub status: BudgetStatus,
    pub per_day: Vec<DailyTotal>,
    pub per_category: Vec<CategoryTotal>,
}

/// Read-only spend figures derived from a plan's subtree.
pub struct BudgetService;

impl BudgetService {
    /// Sum of every item cost across the plan's schedules. Always defined.
    pub fn used_budget(book: &TripBook, plan: &Plan) -> f64 {
        book.items_for_plan(plan.id)
            .iter()
            .map(|item| item.cost_or_zero())
            .sum()
    }

    /// `used / budget * 100`, only for a budget strictly above zero.
    pub fn usage_percentage(book: &TripBook, plan: &Plan) -> Option<f64> {
        let budget = plan.budget.filter(|budget| *budget > 0.0)?;
        Some(Self::used_budget(book, plan) / budget * 100.0)
    }

    /// `budget - used` whenever a budget is set; negative when over budget.
    pub fn remaining_budget(book: &TripBook, plan: &Plan) -> Option<f64> {
        plan.budget
            .map(|budget| budget - Self::used_budget(book, plan))
    }

    pub fn schedule_total(book: &TripBook, schedule_id: Uuid) -> f64 {
        book.items_for(schedule_id)
            .iter()
            .map(|item| item.cost_or_zero())
            .sum()
    }

    pub fn daily_totals(book: &TripBook, plan: &Plan) -> Vec<DailyTotal> {
        book.schedules_for(plan.id)
            .into_iter()
            .map(|schedule| DailyTotal {
                schedule_id: schedule.id,
                date: schedule.date,
                total: Self::schedule_total(book, schedule.id),
            })
            .collect()
    }

    /// Totals per category, in category declaration order, omitting empty ones.
    pub fn category_totals(book: &TripBook, plan: &Plan) -> Vec<CategoryTotal> {
        let items = book.items_for_plan(plan.id);
        ItemCategory::ALL
            .iter()
            .filter_map(|category| {
                let matching: Vec<_> = items
                    .iter()
                    .filter(|item| item.category == *category)
                    .collect();
                if matching.is_empty() {
                    return None;
                }
                Some(CategoryTotal {
                    category: *category,
                    total: matching.iter().map(|item| item.cost_or_zero()).sum(),
                    items: matching.len(),
                })
            })
            .collect()
    }

    pub fn status(budget: Option<f64>, used: f64) -> BudgetStatus {
        let Some(budget) = budget else {
            return BudgetStatus::Unbudgeted;
        };
        if (used - budget).abs() < f64::EPSILON {
            return BudgetStatus::OnTrack;
        }
        match used.partial_cmp(&budget).unwrap_or(Ordering::Equal) {
            Ordering::Greater => BudgetStatus::OverBudget,
            Ordering::Less => BudgetStatus::UnderBudget,
            Ordering::Equal => BudgetStatus::OnTrack,
        }
    }

    pub fn summarize(book: &TripBook, plan: &Plan) -> PlanBudgetSummary {
        let used = Self::used_budget(book, plan);
        PlanBudgetSummary {
            plan_id: plan.id,
            budget: plan.budget,
            used,
            remaining: Self::remaining_budget(book, plan),
            percent_used: Self::usage_percentage(book, plan),
            status: Self::status(plan.budget, used),
            per_day: Self::daily_totals(book, plan),
            per_category: Self::category_totals(book, plan),
        }
    }

    /// Parses free-form budget input keeping only digits and `.`.
    ///
    /// `"¥12,000"` becomes `12000.0`. Blank or unparsable input means no budget.
    pub fn parse_amount(input: &str) -> Option<f64> {
        let cleaned: String = input
            .chars()
            .filter(|ch| ch.is_ascii_digit() || *ch == '.')
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_used_against_budget() {
        assert_eq!(BudgetService::status(None, 10.0), BudgetStatus::Unbudgeted);
        assert_eq!(BudgetService::status(Some(100.0), 10.0), BudgetStatus::UnderBudget);
        assert_eq!(BudgetService::status(Some(100.0), 100.0), BudgetStatus::OnTrack);
        assert_eq!(BudgetService::status(Some(100.0), 120.0), BudgetStatus::OverBudget);
    }

    #[test]
    fn parse_amount_strips_symbols() {
        assert_eq!(BudgetService::parse_amount("¥12,000"), Some(12000.0));
        assert_eq!(BudgetService::parse_amount(" 350.5 yen"), Some(350.5));
        assert_eq!(BudgetService::parse_amount(""), None);
        assert_eq!(BudgetService::parse_amount("none"), None);
        assert_eq!(BudgetService::parse_amount("1.2.3"), None);
    }
}
