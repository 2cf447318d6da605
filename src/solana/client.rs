// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Minimal JSON-RPC 2.0 client for a Solana cluster.

use std::time::Duration;

use base64ct::{Base64, Encoding};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::network::Network;

use super::error::SolanaError;
use super::pubkey::Pubkey;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `{ context, value }` wrapper used by most account queries.
#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
}

#[derive(Deserialize)]
struct AccountInfo {
    /// `[payload, encoding]`
    data: (String, String),
}

/// Cluster client for one network.
#[derive(Debug, Clone)]
pub struct SolanaRpc {
    network: Network,
    url: Url,
    commitment: String,
    http: Client,
}

impl SolanaRpc {
    pub fn new(network: Network, rpc_url: &str, commitment: &str) -> Result<Self, SolanaError> {
        let url = Url::parse(rpc_url).map_err(|e| SolanaError::Transport(format!("invalid RPC URL {rpc_url}: {e}")))?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SolanaError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            network,
            url,
            commitment: commitment.to_string(),
            http,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, SolanaError> {
        tracing::debug!(network = %self.network, method, "Solana RPC call");

        let response = self
            .http
            .post(self.url.clone())
            .json(&RpcRequest {
                jsonrpc: "2.0",
                id: 1,
                method,
                params,
            })
            .send()
            .await
            .map_err(|e| SolanaError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SolanaError::Transport(e.to_string()))?;

        let envelope: RpcResponse<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(SolanaError::Transport(format!("HTTP {}: {body}", status.as_u16())));
            }
            Err(e) => {
                return Err(SolanaError::InvalidResponse(format!("{method}: {e}")));
            }
        };

        if let Some(error) = envelope.error {
            return Err(SolanaError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        envelope
            .result
            .ok_or_else(|| SolanaError::InvalidResponse(format!("{method}: missing result")))
    }

    /// Balance in lamports.
    pub async fn get_balance(&self, address: &Pubkey) -> Result<u64, SolanaError> {
        let balance: WithContext<u64> = self
            .call(
                "getBalance",
                json!([address.to_string(), { "commitment": self.commitment }]),
            )
            .await?;
        Ok(balance.value)
    }

    pub async fn get_latest_blockhash(&self) -> Result<[u8; 32], SolanaError> {
        let latest: WithContext<LatestBlockhash> = self
            .call("getLatestBlockhash", json!([{ "commitment": self.commitment }]))
            .await?;

        latest
            .value
            .blockhash
            .parse::<Pubkey>()
            .map(Pubkey::to_bytes)
            .map_err(|e| SolanaError::InvalidResponse(format!("blockhash: {e}")))
    }

    /// Submit a signed wire-format transaction; returns its signature.
    pub async fn send_transaction(&self, transaction: &[u8]) -> Result<String, SolanaError> {
        self.call(
            "sendTransaction",
            json!([
                Base64::encode_string(transaction),
                { "encoding": "base64", "preflightCommitment": self.commitment }
            ]),
        )
        .await
    }

    pub async fn get_slot(&self) -> Result<u64, SolanaError> {
        self.call("getSlot", json!([{ "commitment": self.commitment }]))
            .await
    }

    /// Raw account data, or `None` when the account does not exist.
    pub async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SolanaError> {
        let info: WithContext<Option<AccountInfo>> = self
            .call(
                "getAccountInfo",
                json!([address.to_string(), { "encoding": "base64", "commitment": self.commitment }]),
            )
            .await?;

        info.value
            .map(|account| {
                Base64::decode_vec(&account.data.0)
                    .map_err(|e| SolanaError::InvalidResponse(format!("account data: {e}")))
            })
            .transpose()
    }
}
