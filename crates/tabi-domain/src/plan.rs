//! The trip container.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::DEFAULT_THEME_NAME;
use crate::common::*;

pub const DEFAULT_TIME_ZONE: &str = "Asia/Tokyo";

/// A trip with a date range, theme, and optional budget. Root of the entity tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub id: Uuid,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub theme_name: String,
    /// Encoded accent color; decoded through the theme codec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default = "Plan::default_time_zone")]
    pub time_zone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn new(
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start_date,
            end_date,
            theme_name: DEFAULT_THEME_NAME.into(),
            theme_color: None,
            budget: None,
            memo: None,
            time_zone: Self::default_time_zone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn default_time_zone() -> String {
        DEFAULT_TIME_ZONE.into()
    }

    /// Number of calendar days the trip covers, both endpoints included.
    pub fn day_count(&self) -> usize {
        inclusive_day_count(self.start_date, self.end_date)
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Displayable for Plan {
    fn display_label(&self) -> String {
        format!(
            "{:<20} {} ~ {}  {} day(s)",
            self.title,
            self.start_date.format("%Y/%m/%d"),
            self.end_date.format("%Y/%m/%d"),
            self.day_count()
        )
    }
}
