// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics and dashboard aggregates.
//!
//! Everything is recomputed from collection contents on each request. The
//! independent counts of a response are issued concurrently.

use crate::db::{collections, MongoDb};
use crate::error::Result;
use crate::models::challenge::{STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_NOT_STARTED};
use crate::models::{
    CategorySlice, DailyPoint, DashboardCharts, GrowthMetric, GrowthSummary, MonthlyPoint,
    SeriesPoint, Statistics, UserCharts, UserStatsSummary,
};
use crate::services::populate;
use crate::services::query::range_clause;
use crate::time_utils::{
    month_window, to_bson_datetime, trailing_days, trailing_months, TimeWindow,
};
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use mongodb::bson::{doc, Bson, Document};

/// Chart colors, assigned cyclically by group position.
pub const PALETTE: [&str; 6] = [
    "#10B981", "#3B82F6", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899",
];

/// Categories counted towards CO2 savings.
pub const ENERGY_CATEGORIES: [&str; 2] = ["Energy Conservation", "Sustainable Transport"];
pub const WASTE_CATEGORY: &str = "Waste Reduction";
pub const WATER_CATEGORY: &str = "Water Conservation";
pub const GREEN_CATEGORY: &str = "Green Living";

// Presentation multipliers per challenge in the category, not measured data.
const CO2_PER_CHALLENGE: f64 = 2.5;
const PLASTIC_PER_CHALLENGE: f64 = 1.8;
const WATER_PER_CHALLENGE: f64 = 5.0;
const TREES_PER_CHALLENGE: f64 = 1.0;

const MONTHLY_BUCKETS: u32 = 6;
const DAILY_BUCKETS: u32 = 7;

/// Label for records with no category.
const UNCATEGORIZED: &str = "Uncategorized";

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Growth of the current month relative to everything before it.
///
/// `previous = total - current_month`; a non-positive previous total yields
/// 0 rather than dividing by zero.
pub fn growth_rate(total: u64, current_month: u64) -> f64 {
    let previous = total as i64 - current_month as i64;
    if previous <= 0 {
        return 0.0;
    }
    round1(current_month as f64 / previous as f64 * 100.0)
}

/// Palette color for the group at `index`.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Turn ordered `(name, count)` groups into colored pie slices.
pub fn category_slices(groups: Vec<(String, u64)>) -> Vec<CategorySlice> {
    groups
        .into_iter()
        .enumerate()
        .map(|(index, (name, value))| CategorySlice {
            name,
            value,
            color: palette_color(index).to_string(),
        })
        .collect()
}

/// Challenge counts in the categories that feed the impact figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpactCounts {
    pub energy: u64,
    pub waste: u64,
    pub water: u64,
    pub green: u64,
}

impl ImpactCounts {
    pub fn co2_saved(&self) -> f64 {
        self.energy as f64 * CO2_PER_CHALLENGE
    }

    pub fn plastic_reduced(&self) -> f64 {
        self.waste as f64 * PLASTIC_PER_CHALLENGE
    }

    pub fn water_saved(&self) -> f64 {
        self.water as f64 * WATER_PER_CHALLENGE
    }

    pub fn trees_planted(&self) -> f64 {
        self.green as f64 * TREES_PER_CHALLENGE
    }
}

/// Read a numeric aggregate value as an integer count.
pub(crate) fn count_value(value: Option<&Bson>) -> u64 {
    number_value(value).max(0) as u64
}

/// Read a numeric field of any BSON number type, defaulting to 0.
pub(crate) fn number_value(value: Option<&Bson>) -> i64 {
    match value {
        Some(Bson::Int32(n)) => i64::from(*n),
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Double(n)) if n.is_finite() => n.round() as i64,
        _ => 0,
    }
}

/// Convert `$group` output (`{_id, count}`) to `(name, count)` pairs.
pub(crate) fn grouped_counts(groups: Vec<Document>) -> Vec<(String, u64)> {
    groups
        .into_iter()
        .map(|group| {
            let name = match group.get("_id") {
                Some(Bson::String(name)) if !name.is_empty() => name.clone(),
                _ => UNCATEGORIZED.to_string(),
            };
            (name, count_value(group.get("count")))
        })
        .collect()
}

/// Pipeline stages grouping by `field` and ordering by count, then name.
pub(crate) fn group_by_stages(field: &str) -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": format!("${}", field), "count": { "$sum": 1 } } },
        doc! { "$sort": { "count": -1, "_id": 1 } },
    ]
}

fn window_filter(
    base: &Document,
    field: &str,
    start: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
) -> Document {
    let mut filter = base.clone();
    if let Some(range) = range_clause(start.map(to_bson_datetime), Some(to_bson_datetime(end))) {
        filter.insert(field, range);
    }
    filter
}

/// Cumulative counts of records with `field` at or before each window end.
async fn cumulative_counts(
    db: &MongoDb,
    collection: &str,
    field: &str,
    base: &Document,
    windows: &[TimeWindow],
) -> Result<Vec<u64>> {
    try_join_all(windows.iter().map(|window| {
        db.count_documents(collection, window_filter(base, field, None, window.end))
    }))
    .await
}

/// Counts of records with `field` inside each window.
async fn windowed_counts(
    db: &MongoDb,
    collection: &str,
    field: &str,
    base: &Document,
    windows: &[TimeWindow],
) -> Result<Vec<u64>> {
    try_join_all(windows.iter().map(|window| {
        db.count_documents(
            collection,
            window_filter(base, field, Some(window.start), window.end),
        )
    }))
    .await
}

/// Growth of one collection, keyed on its timestamp `field`.
async fn growth_metric(
    db: &MongoDb,
    collection: &str,
    field: &str,
    now: DateTime<Utc>,
) -> Result<GrowthMetric> {
    let windows = [month_window(now, 0), month_window(now, 1)];
    let all = doc! {};
    let (total, months) = tokio::try_join!(
        db.count_documents(collection, all.clone()),
        windowed_counts(db, collection, field, &all, &windows),
    )?;

    let current_month = months[0];
    Ok(GrowthMetric {
        total,
        current_month,
        previous_month: months[1],
        growth: growth_rate(total, current_month),
    })
}

async fn total_participants(db: &MongoDb) -> Result<i64> {
    let totals = db
        .aggregate(
            collections::CHALLENGES,
            vec![doc! { "$group": { "_id": Bson::Null, "total": { "$sum": "$participants" } } }],
        )
        .await?;
    Ok(totals
        .first()
        .map(|doc| number_value(doc.get("total")))
        .unwrap_or(0))
}

async fn impact_counts(db: &MongoDb) -> Result<ImpactCounts> {
    let (energy, waste, water, green) = tokio::try_join!(
        db.count_documents(
            collections::CHALLENGES,
            doc! { "category": { "$in": ENERGY_CATEGORIES.to_vec() } },
        ),
        db.count_documents(collections::CHALLENGES, doc! { "category": WASTE_CATEGORY }),
        db.count_documents(collections::CHALLENGES, doc! { "category": WATER_CATEGORY }),
        db.count_documents(collections::CHALLENGES, doc! { "category": GREEN_CATEGORY }),
    )?;
    Ok(ImpactCounts {
        energy,
        waste,
        water,
        green,
    })
}

/// Platform-wide statistics.
pub async fn statistics(db: &MongoDb, now: DateTime<Utc>) -> Result<Statistics> {
    let (total_participants, impact, challenges, users, participation, events) = tokio::try_join!(
        total_participants(db),
        impact_counts(db),
        growth_metric(db, collections::CHALLENGES, "createdAt", now),
        growth_metric(db, collections::USERS, "createdAt", now),
        growth_metric(db, collections::USER_CHALLENGES, "joinDate", now),
        growth_metric(db, collections::EVENTS, "createdAt", now),
    )?;

    tracing::debug!(
        total_challenges = challenges.total,
        total_participants,
        "Computed statistics"
    );

    Ok(Statistics {
        total_challenges: challenges.total,
        total_participants,
        total_user_challenges: participation.total,
        total_users: users.total,
        total_events: events.total,
        co2_saved: impact.co2_saved(),
        plastic_reduced: impact.plastic_reduced(),
        water_saved: impact.water_saved(),
        trees_planted: impact.trees_planted(),
        growth: GrowthSummary {
            challenges,
            users,
            participation,
            events,
        },
    })
}

/// Challenge category pie data.
async fn challenge_categories(db: &MongoDb) -> Result<Vec<CategorySlice>> {
    let groups = db
        .aggregate(collections::CHALLENGES, group_by_stages("category"))
        .await?;
    Ok(category_slices(grouped_counts(groups)))
}

/// Charts for the admin dashboard.
pub async fn dashboard_charts(db: &MongoDb, now: DateTime<Utc>) -> Result<DashboardCharts> {
    let months = trailing_months(now, MONTHLY_BUCKETS);
    let days = trailing_days(now, DAILY_BUCKETS);
    let all = doc! {};

    let (challenges, users, participations, joins, new_users, categories) = tokio::try_join!(
        cumulative_counts(db, collections::CHALLENGES, "createdAt", &all, &months),
        cumulative_counts(db, collections::USERS, "createdAt", &all, &months),
        cumulative_counts(db, collections::USER_CHALLENGES, "joinDate", &all, &months),
        windowed_counts(db, collections::USER_CHALLENGES, "joinDate", &all, &days),
        windowed_counts(db, collections::USERS, "createdAt", &all, &days),
        challenge_categories(db),
    )?;

    let monthly = months
        .iter()
        .enumerate()
        .map(|(i, window)| MonthlyPoint {
            month: window.month_key(),
            label: window.month_label(),
            challenges: challenges[i],
            users: users[i],
            participations: participations[i],
        })
        .collect();

    let daily = days
        .iter()
        .enumerate()
        .map(|(i, window)| DailyPoint {
            date: window.day_key(),
            day: window.day_label(),
            joins: joins[i],
            new_users: new_users[i],
        })
        .collect();

    Ok(DashboardCharts {
        monthly,
        daily,
        categories,
    })
}

/// Participation summary for the user identified by `email`.
pub async fn user_stats(db: &MongoDb, email: &str) -> Result<UserStatsSummary> {
    let mine = doc! { "userId": email };
    let with_status = |status: &str| doc! { "userId": email, "status": status };

    let (joined, completed, in_progress, not_started, progress, events, user) = tokio::try_join!(
        db.count_documents(collections::USER_CHALLENGES, mine.clone()),
        db.count_documents(collections::USER_CHALLENGES, with_status(STATUS_COMPLETED)),
        db.count_documents(collections::USER_CHALLENGES, with_status(STATUS_IN_PROGRESS)),
        db.count_documents(collections::USER_CHALLENGES, with_status(STATUS_NOT_STARTED)),
        db.aggregate(
            collections::USER_CHALLENGES,
            vec![
                doc! { "$match": mine.clone() },
                doc! { "$group": { "_id": Bson::Null, "average": { "$avg": "$progress" } } },
            ],
        ),
        db.count_documents(collections::USER_EVENTS, mine.clone()),
        db.find_document(collections::USERS, doc! { "email": email }),
    )?;

    let average_progress = progress
        .first()
        .and_then(|doc| match doc.get("average") {
            Some(Bson::Double(avg)) if avg.is_finite() => Some(round1(*avg)),
            Some(Bson::Int32(avg)) => Some(f64::from(*avg)),
            Some(Bson::Int64(avg)) => Some(*avg as f64),
            _ => None,
        })
        .unwrap_or(0.0);

    let (total_points, total_activities) = user
        .as_ref()
        .map(|user| {
            (
                number_value(user.get("totalPoints")),
                number_value(user.get("totalActivities")),
            )
        })
        .unwrap_or((0, 0));

    Ok(UserStatsSummary {
        email: email.to_string(),
        joined_challenges: joined,
        completed_challenges: completed,
        in_progress_challenges: in_progress,
        not_started_challenges: not_started,
        average_progress,
        joined_events: events,
        total_points,
        total_activities,
    })
}

/// Charts for a single user's dashboard.
pub async fn user_charts(db: &MongoDb, email: &str, now: DateTime<Utc>) -> Result<UserCharts> {
    let months = trailing_months(now, MONTHLY_BUCKETS);
    let days = trailing_days(now, DAILY_BUCKETS);
    let mine = doc! { "userId": email };

    let mut status_pipeline = vec![doc! { "$match": mine.clone() }];
    status_pipeline.extend(group_by_stages("status"));

    let (categories, statuses, monthly, daily) = tokio::try_join!(
        populate::user_challenge_categories(db, email),
        db.aggregate(collections::USER_CHALLENGES, status_pipeline),
        cumulative_counts(db, collections::USER_CHALLENGES, "joinDate", &mine, &months),
        windowed_counts(db, collections::USER_CHALLENGES, "joinDate", &mine, &days),
    )?;

    Ok(UserCharts {
        categories: category_slices(categories),
        status_breakdown: category_slices(grouped_counts(statuses)),
        monthly: months
            .iter()
            .zip(monthly)
            .map(|(window, count)| SeriesPoint {
                key: window.month_key(),
                label: window.month_label(),
                count,
            })
            .collect(),
        daily: days
            .iter()
            .zip(daily)
            .map(|(window, count)| SeriesPoint {
                key: window.day_key(),
                label: window.day_label(),
                count,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_growth_metric_reports_store_errors() {
        let db = MongoDb::new_mock();
        let err = growth_metric(&db, collections::USERS, "createdAt", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::AppError::Database(_)));
    }

    #[test]
    fn test_growth_rate_zero_previous() {
        assert_eq!(growth_rate(0, 0), 0.0);
        assert_eq!(growth_rate(5, 5), 0.0);
        // Inconsistent data: more this month than in total.
        assert_eq!(growth_rate(3, 5), 0.0);
    }

    #[test]
    fn test_growth_rate_rounding() {
        assert_eq!(growth_rate(20, 5), 33.3);
        assert_eq!(growth_rate(30, 10), 50.0);
        assert_eq!(growth_rate(10, 0), 0.0);
        assert!(growth_rate(u64::MAX / 2, 1).is_finite());
    }

    #[test]
    fn test_palette_cycles_every_six() {
        for i in 0..18 {
            assert_eq!(palette_color(i), palette_color(i + 6));
        }
        assert_eq!(palette_color(0), PALETTE[0]);
        assert_eq!(palette_color(7), PALETTE[1]);
    }

    #[test]
    fn test_category_slices_colored_by_position() {
        let groups: Vec<(String, u64)> = (0..8).map(|i| (format!("cat{i}"), 8 - i)).collect();
        let slices = category_slices(groups);

        assert_eq!(slices.len(), 8);
        assert_eq!(slices[0].color, PALETTE[0]);
        assert_eq!(slices[6].color, PALETTE[0]);
        assert_eq!(slices[7].color, PALETTE[1]);
        assert_eq!(slices[2].name, "cat2");
        assert_eq!(slices[2].value, 6);
    }

    #[test]
    fn test_impact_multipliers() {
        // Seed data: 4 energy + 4 transport, 6 waste, 3 water, 3 green.
        let counts = ImpactCounts {
            energy: 8,
            waste: 6,
            water: 3,
            green: 3,
        };
        assert_eq!(counts.co2_saved(), 20.0);
        assert!((counts.plastic_reduced() - 10.8).abs() < 1e-9);
        assert_eq!(counts.water_saved(), 15.0);
        assert_eq!(counts.trees_planted(), 3.0);
    }

    #[test]
    fn test_grouped_counts_handles_missing_names_and_number_types() {
        let groups = vec![
            doc! { "_id": "Waste Reduction", "count": 6_i32 },
            doc! { "_id": Bson::Null, "count": 2_i64 },
            doc! { "_id": "Green Living", "count": 3.0 },
        ];

        let counts = grouped_counts(groups);

        assert_eq!(
            counts,
            vec![
                ("Waste Reduction".to_string(), 6),
                (UNCATEGORIZED.to_string(), 2),
                ("Green Living".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_number_value() {
        assert_eq!(number_value(Some(&Bson::Int32(7))), 7);
        assert_eq!(number_value(Some(&Bson::Double(f64::NAN))), 0);
        assert_eq!(number_value(Some(&Bson::String("12".into()))), 0);
        assert_eq!(number_value(None), 0);
        assert_eq!(count_value(Some(&Bson::Int64(-4))), 0);
    }

    #[test]
    fn test_window_filter_bounds() {
        let now = chrono::DateTime::parse_from_rfc3339("2024-03-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let window = month_window(now, 0);
        let base = doc! { "userId": "jane@example.com" };

        let cumulative = window_filter(&base, "joinDate", None, window.end);
        let range = cumulative.get_document("joinDate").unwrap();
        assert!(!range.contains_key("$gte"));
        assert!(range.contains_key("$lte"));
        assert_eq!(cumulative.get_str("userId").unwrap(), "jane@example.com");

        let windowed = window_filter(&base, "joinDate", Some(window.start), window.end);
        assert!(windowed.get_document("joinDate").unwrap().contains_key("$gte"));
    }
}
