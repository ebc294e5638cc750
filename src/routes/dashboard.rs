// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics and dashboard routes.

use crate::error::{AppError, Result};
use crate::models::{DashboardCharts, Statistics, UserCharts, UserStatsSummary};
use crate::services::stats;
use crate::AppState;
use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/statistics", get(get_statistics))
        .route("/api/dashboard/charts", get(get_dashboard_charts))
        .route("/api/dashboard/user-stats", get(get_user_stats))
        .route("/api/dashboard/user-charts", get(get_user_charts))
}

/// `?email=` selecting the user for the per-user dashboards.
#[derive(Debug, Deserialize)]
struct UserQuery {
    email: Option<String>,
}

impl UserQuery {
    fn email(&self) -> Result<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AppError::Validation("email query parameter is required".to_string()))
    }
}

// ─── Platform ────────────────────────────────────────────────

async fn get_statistics(State(state): State<Arc<AppState>>) -> Result<Json<Statistics>> {
    let statistics = stats::statistics(&state.db, chrono::Utc::now()).await?;
    Ok(Json(statistics))
}

async fn get_dashboard_charts(State(state): State<Arc<AppState>>) -> Result<Json<DashboardCharts>> {
    let charts = stats::dashboard_charts(&state.db, chrono::Utc::now()).await?;
    Ok(Json(charts))
}

// ─── Per User ────────────────────────────────────────────────

async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserStatsSummary>> {
    let email = query.email()?;
    Ok(Json(stats::user_stats(&state.db, email).await?))
}

async fn get_user_charts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserCharts>> {
    let email = query.email()?;
    Ok(Json(
        stats::user_charts(&state.db, email, chrono::Utc::now()).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_email_rejected() {
        let query = UserQuery {
            email: Some("   ".to_string()),
        };
        assert!(matches!(query.email(), Err(AppError::Validation(_))));

        let query = UserQuery { email: None };
        assert!(query.email().is_err());

        let query = UserQuery {
            email: Some("jane@example.com".to_string()),
        };
        assert_eq!(query.email().unwrap(), "jane@example.com");
    }
}
