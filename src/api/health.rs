// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::now_timestamp;
use crate::state::AppState;

/// Liveness response. Not wrapped in the success envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Seconds since the service started.
    pub uptime: f64,
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// Health check endpoint handler.
///
/// Does not contact any chain node and requires no API key.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse),
        (status = 429, description = "Rate limit exceeded")
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: now_timestamp(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
