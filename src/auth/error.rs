// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Why a request was refused by the API-key check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `x-api-key` header present
    #[error("API key header is missing")]
    MissingApiKey,
    /// Header present but not the configured key
    #[error("API key does not match")]
    InvalidApiKey,
}

impl AuthError {
    /// Client-facing message. Both cases read the same so callers cannot
    /// probe which one applied.
    pub fn public_message(&self) -> &'static str {
        "Unauthorized: Invalid or missing API key"
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::unauthorized(self.public_message()).into_response()
    }
}
