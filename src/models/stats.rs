//! Response shapes for listings, statistics and dashboard charts.
//!
//! Everything here is recomputed per request from collection contents;
//! nothing is stored.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Pagination metadata attached to paged listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PaginationMeta {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub current_page: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_pages: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_items: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub items_per_page: u64,
}

/// Month-over-month growth for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GrowthMetric {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub current_month: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub previous_month: u64,
    /// Percentage, one decimal place
    pub growth: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GrowthSummary {
    pub challenges: GrowthMetric,
    pub users: GrowthMetric,
    pub participation: GrowthMetric,
    pub events: GrowthMetric,
}

/// Platform-wide statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Statistics {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_challenges: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_participants: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_user_challenges: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_users: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_events: u64,
    #[serde(rename = "co2Saved")]
    pub co2_saved: f64,
    pub plastic_reduced: f64,
    pub water_saved: f64,
    pub trees_planted: f64,
    pub growth: GrowthSummary,
}

/// One slice of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategorySlice {
    pub name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub value: u64,
    pub color: String,
}

/// Cumulative totals at the end of a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    pub label: String,
    pub challenges: u64,
    pub users: u64,
    pub participations: u64,
}

/// New records within a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub day: String,
    pub joins: u64,
    pub new_users: u64,
}

/// A single-valued point in a per-user series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub key: String,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub monthly: Vec<MonthlyPoint>,
    pub daily: Vec<DailyPoint>,
    pub categories: Vec<CategorySlice>,
}

/// Participation summary for one user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsSummary {
    pub email: String,
    pub joined_challenges: u64,
    pub completed_challenges: u64,
    pub in_progress_challenges: u64,
    pub not_started_challenges: u64,
    pub average_progress: f64,
    pub joined_events: u64,
    pub total_points: i64,
    pub total_activities: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCharts {
    pub categories: Vec<CategorySlice>,
    pub status_breakdown: Vec<CategorySlice>,
    /// Cumulative joins at each month end
    pub monthly: Vec<SeriesPoint>,
    /// Joins per day
    pub daily: Vec<SeriesPoint>,
}
