// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Managed wallet bootstrap.
//!
//! The node owns the wallet; this service only knows its name. Wallet-scoped
//! calls go through [`LitecoinRpc::wallet_call`], which recovers from an
//! unloaded or missing wallet by loading or creating it, then retries the
//! call exactly once. A failure after recovery propagates.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::rpc::{LitecoinRpc, RpcError, RpcScope};

/// Generic wallet failure; `createwallet` uses it when the wallet exists.
pub const RPC_WALLET_ERROR: i64 = -4;
/// Wallet not loaded, or no wallet file with that name.
pub const RPC_WALLET_NOT_FOUND: i64 = -18;
/// `loadwallet` on a wallet that is already loaded.
pub const RPC_WALLET_ALREADY_LOADED: i64 = -35;

impl LitecoinRpc {
    /// Call a wallet-scoped method, bootstrapping the wallet once if the
    /// node reports it is not loaded.
    pub async fn wallet_call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        match self.call(method, params.clone(), RpcScope::Wallet).await {
            Err(e) if e.node_code() == Some(RPC_WALLET_NOT_FOUND) => {
                tracing::info!(
                    network = %self.network(),
                    wallet = self.wallet_name(),
                    method,
                    "Wallet not loaded, bootstrapping"
                );
                self.ensure_wallet_loaded().await?;
                self.call(method, params, RpcScope::Wallet).await
            }
            other => other,
        }
    }

    /// Load the managed wallet, creating it when the node has none.
    ///
    /// Idempotent: "already loaded" and "already exists" count as success.
    pub async fn ensure_wallet_loaded(&self) -> Result<(), RpcError> {
        let name = self.wallet_name();

        match self
            .call::<Value>("loadwallet", json!([name]), RpcScope::Node)
            .await
        {
            Ok(_) => {
                tracing::info!(network = %self.network(), wallet = name, "Wallet loaded");
                Ok(())
            }
            Err(e) if e.node_code() == Some(RPC_WALLET_ALREADY_LOADED) => Ok(()),
            Err(e) if e.node_code() == Some(RPC_WALLET_NOT_FOUND) => self.create_wallet().await,
            Err(e) => Err(e),
        }
    }

    async fn create_wallet(&self) -> Result<(), RpcError> {
        let name = self.wallet_name();

        match self
            .call::<Value>("createwallet", json!([name]), RpcScope::Node)
            .await
        {
            Ok(_) => {
                tracing::info!(network = %self.network(), wallet = name, "Wallet created");
                Ok(())
            }
            Err(e)
                if matches!(
                    e.node_code(),
                    Some(RPC_WALLET_ERROR) | Some(RPC_WALLET_ALREADY_LOADED)
                ) =>
            {
                tracing::warn!(
                    network = %self.network(),
                    wallet = name,
                    error = %e,
                    "Wallet already exists, continuing"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
