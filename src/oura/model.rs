//! Snapshot types for aggregated health data.

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

/// Date format the vendor API expects for `start_date` / `end_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The four data categories pulled for every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCategory {
    Sleep,
    Readiness,
    Activity,
    Workout,
}

impl HealthCategory {
    /// All categories in fetch order.
    pub const ALL: [HealthCategory; 4] = [
        HealthCategory::Sleep,
        HealthCategory::Readiness,
        HealthCategory::Activity,
        HealthCategory::Workout,
    ];

    /// Path segment under the usercollection base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Sleep => "daily_sleep",
            Self::Readiness => "daily_readiness",
            Self::Activity => "daily_activity",
            Self::Workout => "workout",
        }
    }
}

impl std::fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Sleep => "sleep",
            Self::Readiness => "readiness",
            Self::Activity => "activity",
            Self::Workout => "workout",
        };
        write!(f, "{s}")
    }
}

/// Inclusive calendar window ending on `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window of `days_back` days ending on `today`. The start saturates at
    /// the earliest representable date.
    pub fn trailing(today: NaiveDate, days_back: u32) -> Self {
        Self {
            start: today
                .checked_sub_days(Days::new(u64::from(days_back)))
                .unwrap_or(NaiveDate::MIN),
            end: today,
        }
    }

    /// Window of `days_back` days ending on the local calendar date.
    pub fn ending_today(days_back: u32) -> Self {
        Self::trailing(Local::now().date_naive(), days_back)
    }

    /// `(start_date, end_date)` query parameters in `YYYY-MM-DD` form.
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", self.start.format(DATE_FORMAT).to_string()),
            ("end_date", self.end.format(DATE_FORMAT).to_string()),
        ]
    }
}

/// Raw vendor payloads for one window, one field per category.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub window: DateWindow,
    pub sleep: serde_json::Value,
    pub readiness: serde_json::Value,
    pub activity: serde_json::Value,
    pub workout: serde_json::Value,
}

impl HealthSnapshot {
    /// Days between the window's start and end dates.
    pub fn days_covered(&self) -> i64 {
        (self.window.end - self.window.start).num_days()
    }
}
