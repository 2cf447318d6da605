// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Per-client rate limiting
//!
//! Sliding-window limiter keyed by client IP. Each client keeps the instants
//! of its accepted requests inside the window; a request is refused once the
//! window already holds `max_requests` entries. Refused requests are not
//! recorded.
//!
//! ## Eviction
//!
//! Clients that stop sending requests would otherwise keep their entry
//! forever. [`RateLimiter::run_sweeper`] drops expired windows periodically
//! and stops on a `tokio_util::sync::CancellationToken`, like the other
//! background tasks in this service.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use crate::state::AppState;

const UNKNOWN_CLIENT: &str = "unknown";

pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    clients: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: config.window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn clients(&self) -> MutexGuard<'_, HashMap<String, VecDeque<Instant>>> {
        // The map holds no invariant a panicking holder could break.
        self.clients.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a request from `client` at `now`. Returns `false` when the
    /// client has exhausted its window.
    pub fn check(&self, client: &str, now: Instant) -> bool {
        let mut clients = self.clients();
        let hits = clients.entry(client.to_string()).or_default();

        while hits.front().is_some_and(|t| now.duration_since(*t) >= self.window) {
            hits.pop_front();
        }

        if hits.len() >= self.max_requests {
            return false;
        }

        hits.push_back(now);
        true
    }

    /// Drop every client whose window has fully expired. Returns how many
    /// entries were removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut clients = self.clients();
        let before = clients.len();
        clients.retain(|_, hits| hits.back().is_some_and(|t| now.duration_since(*t) < self.window));
        before - clients.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients().len()
    }

    /// Sweep expired windows once per window length until cancelled.
    ///
    /// ```rust,ignore
    /// tokio::spawn(limiter.clone().run_sweeper(shutdown.clone()));
    /// ```
    pub async fn run_sweeper(self: Arc<Self>, shutdown: CancellationToken) {
        let interval = self.window.max(Duration::from_secs(1));
        info!(interval_secs = interval.as_secs(), "Rate limit sweeper starting");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    let removed = self.sweep(Instant::now());
                    if removed > 0 {
                        debug!(removed, remaining = self.tracked_clients(), "Rate limit sweeper: evicted idle clients");
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("Rate limit sweeper shutting down");
                    return;
                }
            }
        }
    }
}

/// Middleware refusing clients over their limit with a 429 envelope.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    if !state.rate_limiter.check(&client, Instant::now()) {
        warn!(ip = %client, path = %request.uri().path(), "Rate limit exceeded");
        return ApiError::too_many_requests("Too many requests, please try again later.").into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: usize, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            max_requests,
            window: Duration::from_secs(window_secs),
        })
    }

    #[test]
    fn allows_up_to_limit_then_refuses() {
        let limiter = limiter(3, 60);
        let now = Instant::now();

        assert!(limiter.check("1.2.3.4", now));
        assert!(limiter.check("1.2.3.4", now));
        assert!(limiter.check("1.2.3.4", now));
        assert!(!limiter.check("1.2.3.4", now));
        // Other clients are unaffected.
        assert!(limiter.check("5.6.7.8", now));
    }

    #[test]
    fn window_slides() {
        let limiter = limiter(2, 10);
        let start = Instant::now();

        assert!(limiter.check("c", start));
        assert!(limiter.check("c", start + Duration::from_secs(5)));
        assert!(!limiter.check("c", start + Duration::from_secs(9)));
        // The first hit has left the window.
        assert!(limiter.check("c", start + Duration::from_secs(10)));
        assert!(!limiter.check("c", start + Duration::from_secs(11)));
    }

    #[test]
    fn refused_requests_are_not_counted() {
        let limiter = limiter(1, 10);
        let start = Instant::now();

        assert!(limiter.check("c", start));
        for s in 1..10 {
            assert!(!limiter.check("c", start + Duration::from_secs(s)));
        }
        assert!(limiter.check("c", start + Duration::from_secs(10)));
    }

    #[test]
    fn sweep_evicts_only_idle_clients() {
        let limiter = limiter(5, 10);
        let start = Instant::now();

        limiter.check("idle", start);
        limiter.check("busy", start + Duration::from_secs(8));

        assert_eq!(limiter.sweep(start + Duration::from_secs(12)), 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[tokio::test]
    async fn sweeper_stops_on_cancel() {
        let limiter = Arc::new(limiter(5, 3600));
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(limiter.run_sweeper(shutdown.clone()));

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
