// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! EcoTrack: community sustainability challenges
//!
//! This crate provides the backend API for browsing and joining challenges
//! and events, reading tips, blogs and testimonials, and viewing platform
//! statistics.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::MongoDb;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: MongoDb,
}
