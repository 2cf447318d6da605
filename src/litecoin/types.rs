// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Litecoin node payloads and API response types.
//!
//! Node amounts arrive as decimal JSON numbers with 8 decimal places. They
//! are converted to [`Amount`] (integer base units) on deserialization so fee
//! and change arithmetic is exact.

use bitcoin::Amount;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::network::Network;

/// A spendable coin held by the managed wallet (`listunspent` entry).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnspentOutput {
    pub txid: String,
    /// Output index within `txid`.
    pub vout: u32,
    #[serde(default)]
    pub address: String,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: Amount,
    #[serde(default)]
    pub confirmations: u64,
}

/// Input reference used by `createrawtransaction`.
#[derive(Debug, Clone, Serialize)]
pub struct OutPointRef {
    pub txid: String,
    pub vout: u32,
}

/// One output of a raw transaction draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftOutput {
    /// Null-data output carrying the hex payload verbatim.
    Data(String),
    /// Payment back to an address.
    Payment { address: String, amount: Amount },
}

impl DraftOutput {
    /// Node wire form: `{"data": hex}` or `{address: amount}`.
    pub fn to_rpc(&self) -> serde_json::Value {
        let mut entry = serde_json::Map::new();
        match self {
            DraftOutput::Data(hex) => {
                entry.insert("data".to_string(), serde_json::Value::String(hex.clone()));
            }
            DraftOutput::Payment { address, amount } => {
                entry.insert(address.clone(), serde_json::json!(amount.to_btc()));
            }
        }
        serde_json::Value::Object(entry)
    }
}

/// Result of `signrawtransactionwithwallet`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedTransaction {
    pub hex: String,
    pub complete: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptPubKey {
    pub hex: String,
    #[serde(rename = "type")]
    pub script_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTransactionOutput {
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
}

/// Verbose `getrawtransaction` result, reduced to the fields in use.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransactionRecord {
    /// Absent for mempool transactions.
    #[serde(default)]
    pub confirmations: u64,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub blocktime: Option<i64>,
    pub vout: Vec<RawTransactionOutput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeNetworkInfo {
    pub version: u64,
    pub subversion: String,
    pub connections: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletTransaction {
    #[serde(default)]
    pub fee: Option<f64>,
}

// =============================================================================
// API responses
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LitecoinBalanceResponse {
    pub address: String,
    /// Confirmed amount received, in LTC.
    pub balance: f64,
    /// Amount received but not yet confirmed, in LTC.
    pub unconfirmed_balance: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedWallet {
    pub address: String,
    pub private_key: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LitecoinTransferResponse {
    pub tx_id: String,
    pub amount: f64,
    pub fee: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAssetResponse {
    pub tx_id: String,
    /// Identical to `tx_id`: the transaction is the asset record.
    pub asset_id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAssetResponse {
    /// True once the transaction has at least one confirmation.
    pub valid: bool,
    /// Block time (or first-seen time when unconfirmed), RFC 3339.
    pub timestamp: Option<String>,
    /// Embedded payload, lowercase hex.
    pub data: String,
    pub confirmations: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfoResponse {
    pub version: u64,
    pub subversion: String,
    pub connections: u64,
    pub network: Network,
}
