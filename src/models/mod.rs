// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod blog;
pub mod challenge;
pub mod event;
pub mod stats;
pub mod user;

pub use blog::{Comment, CommentRequest};
pub use challenge::{JoinRequest, ProgressUpdate, UserChallenge};
pub use event::UserEvent;
pub use stats::{
    CategorySlice, DailyPoint, DashboardCharts, GrowthMetric, GrowthSummary, MonthlyPoint,
    PaginationMeta, SeriesPoint, Statistics, UserCharts, UserStatsSummary,
};
pub use user::UserDefaults;
