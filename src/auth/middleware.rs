// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API-key middleware for Axum.
//!
//! Applied to the `/api/v1` router subtree:
//!
//! ```rust,ignore
//! let api = Router::new()
//!     .nest("/litecoin", litecoin_routes)
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), require_api_key));
//! ```

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};

use super::AuthError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Compares SHA-256 digests; timing does not reveal a matching key prefix.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    Sha256::digest(provided) == Sha256::digest(expected)
}

/// Check the `x-api-key` header against the configured key.
pub fn check_api_key(headers: &HeaderMap, expected: &str) -> Result<(), AuthError> {
    let provided = headers.get(API_KEY_HEADER).ok_or(AuthError::MissingApiKey)?;

    if keys_match(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}

/// Authentication middleware function.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match check_api_key(request.headers(), &state.config.api_key) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!(
                reason = %e,
                path = %request.uri().path(),
                method = %request.method(),
                "Unauthorized access attempt"
            );
            e.into_response()
        }
    }
}
