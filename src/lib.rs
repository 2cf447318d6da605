// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ganji Chain Gateway - Litecoin notarization and Solana licensing
//!
//! This crate provides an API-key protected HTTP service in front of a
//! Litecoin Core compatible node and a Solana RPC endpoint. It holds no
//! chain state of its own.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - API-key authentication
//! - `litecoin` - Litecoin JSON-RPC client, wallet and OP_RETURN anchoring
//! - `solana` - Solana JSON-RPC client, transactions and license program
//! - `rate_limit` - Per-IP sliding window limiter

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod litecoin;
pub mod models;
pub mod network;
pub mod rate_limit;
pub mod solana;
pub mod state;
