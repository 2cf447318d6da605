// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::litecoin::LitecoinService;
use crate::rate_limit::RateLimiter;
use crate::solana::SolanaService;

const GENERIC_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub litecoin: Arc<LitecoinService>,
    pub solana: Arc<SolanaService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub started_at: Instant,
}

impl AppState {
    /// Build chain clients for every configured network.
    pub fn new(config: AppConfig) -> Self {
        let litecoin = LitecoinService::from_config(&config.litecoin);
        let solana = SolanaService::from_config(&config.solana);
        Self::with_services(config, litecoin, solana)
    }

    pub fn with_services(config: AppConfig, litecoin: LitecoinService, solana: SolanaService) -> Self {
        Self {
            rate_limiter: Arc::new(RateLimiter::new(&config.rate_limit)),
            config: Arc::new(config),
            litecoin: Arc::new(litecoin),
            solana: Arc::new(solana),
            started_at: Instant::now(),
        }
    }

    /// Log a failed service call and turn it into a 500. The raw message is
    /// only exposed outside production.
    pub fn service_error(&self, operation: &str, error: impl Display) -> ApiError {
        tracing::error!(operation, error = %error, "Request failed");

        if self.config.environment.exposes_error_details() {
            ApiError::internal(error.to_string())
        } else {
            ApiError::internal(GENERIC_ERROR_MESSAGE)
        }
    }
}
