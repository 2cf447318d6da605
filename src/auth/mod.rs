// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Shared-secret authentication for the `/api/v1` routes.
//!
//! ## Auth Flow
//!
//! 1. The caller sends `x-api-key: <key>`
//! 2. The middleware compares it with `AUTH_API_KEY`
//! 3. Missing or wrong keys get a 401 envelope; the handler never runs
//!
//! `/health` and the API docs are not behind the key.

pub mod error;
pub mod middleware;

pub use error::AuthError;
pub use middleware::{require_api_key, API_KEY_HEADER};
