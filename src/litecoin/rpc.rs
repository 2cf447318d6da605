// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC 1.0 client for a Litecoin Core compatible node.
//!
//! One [`LitecoinRpc`] is bound to one network's endpoint and credentials.
//! Calls are either node-global or scoped to the managed wallet
//! (`/wallet/<name>`), selected per call with [`RpcScope`].

use std::time::Duration;

use base64ct::{Base64, Encoding};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::LitecoinNodeConfig;
use crate::network::Network;

/// Which endpoint a call is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcScope {
    /// The node-global endpoint.
    Node,
    /// The endpoint scoped to the managed wallet.
    Wallet,
}

/// Errors returned by [`LitecoinRpc::call`].
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The HTTP exchange itself failed. `status` is `None` when no response
    /// was received.
    #[error("RPC request failed ({}): {body}", display_status(.status))]
    Transport { status: Option<u16>, body: String },

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error: {message} (code: {code})")]
    Node { code: i64, message: String },

    /// The node answered 2xx but the body did not match the expected shape.
    #[error("Malformed RPC response for {method}: {reason}")]
    Malformed { method: String, reason: String },

    #[error("Invalid RPC endpoint: {0}")]
    InvalidEndpoint(String),
}

fn display_status(status: &Option<u16>) -> String {
    status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "no response".to_string())
}

impl RpcError {
    /// Node error code, when the failure came from the node.
    pub fn node_code(&self) -> Option<i64> {
        match self {
            RpcError::Node { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: String,
    method: &'a str,
    params: &'a Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Litecoin node client for one network.
#[derive(Debug, Clone)]
pub struct LitecoinRpc {
    network: Network,
    node_url: Url,
    wallet_url: Url,
    wallet_name: String,
    authorization: String,
    http: Client,
}

impl LitecoinRpc {
    pub fn new(
        network: Network,
        node: &LitecoinNodeConfig,
        wallet_name: &str,
        timeout: Duration,
    ) -> Result<Self, RpcError> {
        let node_url = Url::parse(&node.url).map_err(|e| RpcError::InvalidEndpoint(e.to_string()))?;

        let mut wallet_url = node_url.clone();
        wallet_url
            .path_segments_mut()
            .map_err(|_| RpcError::InvalidEndpoint(format!("{} cannot be a base URL", node.url)))?
            .pop_if_empty()
            .push("wallet")
            .push(wallet_name);

        let credentials = format!("{}:{}", node.username, node.password);
        let authorization = format!("Basic {}", Base64::encode_string(credentials.as_bytes()));

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::InvalidEndpoint(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            network,
            node_url,
            wallet_url,
            wallet_name: wallet_name.to_string(),
            authorization,
            http,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn wallet_name(&self) -> &str {
        &self.wallet_name
    }

    /// Issue one JSON-RPC call and decode its `result`.
    ///
    /// `params` must be a JSON array in the method's positional order.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        scope: RpcScope,
    ) -> Result<T, RpcError> {
        let url = match scope {
            RpcScope::Node => &self.node_url,
            RpcScope::Wallet => &self.wallet_url,
        };

        let request = RpcRequest {
            jsonrpc: "1.0",
            id: format!("ganji-{}", uuid::Uuid::new_v4()),
            method,
            params: &params,
        };

        tracing::debug!(network = %self.network, method, ?scope, "Litecoin RPC call");

        let response = self
            .http
            .post(url.clone())
            .header(header::AUTHORIZATION, &self.authorization)
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcError::Transport {
                status: e.status().map(|s| s.as_u16()),
                body: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| RpcError::Transport {
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;

        // Litecoin Core reports RPC errors as HTTP 500 with a JSON-RPC body,
        // so the envelope is inspected before the status code.
        let envelope = serde_json::from_str::<RpcResponse>(&body);

        if let Ok(RpcResponse {
            error: Some(error), ..
        }) = &envelope
        {
            return Err(RpcError::Node {
                code: error.code,
                message: error.message.clone(),
            });
        }

        if !status.is_success() {
            tracing::error!(
                network = %self.network,
                method,
                status = status.as_u16(),
                body = %body,
                "Litecoin RPC request failed"
            );
            return Err(RpcError::Transport {
                status: Some(status.as_u16()),
                body,
            });
        }

        let envelope = envelope.map_err(|e| RpcError::Malformed {
            method: method.to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_value(envelope.result).map_err(|e| RpcError::Malformed {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn wallet_url_is_scoped_under_base() {
        let rpc = client_for("http://127.0.0.1:19332");
        assert_eq!(rpc.wallet_url.as_str(), "http://127.0.0.1:19332/wallet/ganji");
        assert_eq!(rpc.node_url.as_str(), "http://127.0.0.1:19332/");
    }

    #[test]
    fn wallet_name_is_path_encoded() {
        let node = LitecoinNodeConfig {
            url: "http://node:9332/".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
        };
        let rpc = LitecoinRpc::new(Network::Mainnet, &node, "my wallet", Duration::from_secs(1)).unwrap();
        assert_eq!(rpc.wallet_url.as_str(), "http://node:9332/wallet/my%20wallet");
    }

    #[tokio::test]
    async fn call_sends_envelope_with_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Basic dXNlcjpwYXNz")
            .match_body(Matcher::PartialJson(json!({
                "jsonrpc": "1.0",
                "method": "getblockcount",
                "params": []
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ok_body(json!(2_750_000)))
            .create_async()
            .await;

        let rpc = client_for(&server.url());
        let height: u64 = rpc.call("getblockcount", json!([]), RpcScope::Node).await.unwrap();

        assert_eq!(height, 2_750_000);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn node_error_is_surfaced_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", WALLET_PATH)
            .with_status(500)
            .with_body(error_body(-6, "Insufficient funds"))
            .create_async()
            .await;

        let rpc = client_for(&server.url());
        let err = rpc
            .call::<String>("sendtoaddress", json!(["Lx", 1.0]), RpcScope::Wallet)
            .await
            .unwrap_err();

        assert_eq!(err.node_code(), Some(-6));
        assert_eq!(err.to_string(), "RPC error: Insufficient funds (code: -6)");
    }

    #[tokio::test]
    async fn non_json_failure_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(401)
            .with_body("Unauthorized")
            .create_async()
            .await;

        let rpc = client_for(&server.url());
        let err = rpc
            .call::<Value>("getnetworkinfo", json!([]), RpcScope::Node)
            .await
            .unwrap_err();

        match err {
            RpcError::Transport { status, body } => {
                assert_eq!(status, Some(401));
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_result_shape_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(ok_body(json!("not-a-number")))
            .create_async()
            .await;

        let rpc = client_for(&server.url());
        let err = rpc
            .call::<u64>("getblockcount", json!([]), RpcScope::Node)
            .await
            .unwrap_err();

        assert!(matches!(err, RpcError::Malformed { ref method, .. } if method == "getblockcount"));
    }
}
