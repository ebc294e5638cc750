// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Query composition, aggregation and mutation services.

pub mod membership;
pub mod pagination;
pub mod populate;
pub mod query;
pub mod stats;

pub use pagination::{fetch_page, PageRequest, SortOrder};
pub use query::{BlogQuery, ChallengeQuery};
