// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Litecoin integration.
//!
//! - [`rpc`]: JSON-RPC 1.0 client, node and wallet scoped
//! - [`wallet`]: managed wallet bootstrap with a single retry
//! - [`asset`]: `OP_RETURN` registration and verification
//! - [`service`]: per-network facade used by the API

pub mod asset;
pub mod error;
pub mod rpc;
pub mod service;
pub mod types;
pub mod wallet;

pub use error::LitecoinError;
pub use rpc::{LitecoinRpc, RpcError, RpcScope};
pub use service::LitecoinService;
