//! A single activity or expense within a day.

use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{de::Deserializer, Deserialize, Serialize};
use uuid::Uuid;

use crate::color::{ThemeColor, BLUE, GRAY, GREEN, ORANGE, PINK, PURPLE, RED};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanItem {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub time: NaiveTime,
    #[serde(default)]
    pub category: ItemCategory,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlanItem {
    pub fn new(
        schedule_id: Uuid,
        time: NaiveTime,
        category: ItemCategory,
        name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            schedule_id,
            time,
            category,
            name: name.into(),
            memo: None,
            cost: None,
            photo: None,
            location: None,
            address: None,
            url: None,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Cost contribution to budget totals; an absent cost counts as zero.
    pub fn cost_or_zero(&self) -> f64 {
        self.cost.unwrap_or(0.0)
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Fixed set of item categories. Unknown stored codes read back as `Other`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Transport,
    Meal,
    Sightseeing,
    Hotel,
    Activity,
    Shopping,
    #[default]
    Other,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 7] = [
        ItemCategory::Transport,
        ItemCategory::Meal,
        ItemCategory::Sightseeing,
        ItemCategory::Hotel,
        ItemCategory::Activity,
        ItemCategory::Shopping,
        ItemCategory::Other,
    ];

    pub fn from_code(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "transport" => ItemCategory::Transport,
            "meal" => ItemCategory::Meal,
            "sightseeing" => ItemCategory::Sightseeing,
            "hotel" => ItemCategory::Hotel,
            "activity" => ItemCategory::Activity,
            "shopping" => ItemCategory::Shopping,
            _ => ItemCategory::Other,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ItemCategory::Transport => "transport",
            ItemCategory::Meal => "meal",
            ItemCategory::Sightseeing => "sightseeing",
            ItemCategory::Hotel => "hotel",
            ItemCategory::Activity => "activity",
            ItemCategory::Shopping => "shopping",
            ItemCategory::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemCategory::Transport => "Transport",
            ItemCategory::Meal => "Meal",
            ItemCategory::Sightseeing => "Sightseeing",
            ItemCategory::Hotel => "Hotel",
            ItemCategory::Activity => "Activity",
            ItemCategory::Shopping => "Shopping",
            ItemCategory::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ItemCategory::Transport => "bus.fill",
            ItemCategory::Meal => "fork.knife",
            ItemCategory::Sightseeing => "camera.fill",
            ItemCategory::Hotel => "bed.double.fill",
            ItemCategory::Activity => "figure.walk",
            ItemCategory::Shopping => "cart.fill",
            ItemCategory::Other => "mappin",
        }
    }

    pub fn color(self) -> ThemeColor {
        match self {
            ItemCategory::Transport => BLUE,
            ItemCategory::Meal => ORANGE,
            ItemCategory::Sightseeing => GREEN,
            ItemCategory::Hotel => PURPLE,
            ItemCategory::Activity => PINK,
            ItemCategory::Shopping => RED,
            ItemCategory::Other => GRAY,
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ItemCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|code| ItemCategory::from_code(&code))
            .unwrap_or_default())
    }
}
