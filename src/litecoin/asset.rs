// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset notarization on Litecoin.
//!
//! Registration embeds caller-supplied bytes in a null-data (`OP_RETURN`)
//! output of a transaction funded from the managed wallet. The broadcast
//! transaction id is the asset id; no local record is kept.
//!
//! ## Registration flow
//!
//! 1. `listunspent` (wallet, bootstrapped) and take the first output worth at
//!    least [`REGISTRATION_FEE`], in node order.
//! 2. Outputs: the data output, plus change back to the funding address when
//!    the change exceeds [`DUST_THRESHOLD`]. Smaller change goes to the fee.
//! 3. `createrawtransaction` → `signrawtransactionwithwallet` → refuse to
//!    broadcast unless signing is complete → `sendrawtransaction`.
//!
//! Broadcast is the commit point: any failure before it leaves the wallet
//! untouched. Concurrent registrations are not coordinated and may pick the
//! same output; the node rejects the second broadcast.

use bitcoin::{
    opcodes::{all::OP_RETURN, Class, ClassifyContext},
    script::Instruction,
    Amount, ScriptBuf,
};
use chrono::{DateTime, SecondsFormat};
use serde_json::json;

use super::error::LitecoinError;
use super::rpc::{LitecoinRpc, RpcScope};
use super::types::{
    DraftOutput, OutPointRef, RawTransactionRecord, RegisterAssetResponse, SignedTransaction,
    UnspentOutput, VerifyAssetResponse,
};

/// 80 payload bytes, hex encoded.
pub const MAX_PAYLOAD_HEX_LEN: usize = 160;

/// Flat fee paid by a registration (0.0001 LTC).
pub const REGISTRATION_FEE: Amount = Amount::from_sat(10_000);

/// Change at or below this (0.00001 LTC) is not worth an output.
pub const DUST_THRESHOLD: Amount = Amount::from_sat(1_000);

const NULL_DATA_SCRIPT_TYPE: &str = "nulldata";

/// Registration and verification engine bound to one network's node.
pub struct AssetRegistry<'a> {
    rpc: &'a LitecoinRpc,
}

impl<'a> AssetRegistry<'a> {
    pub fn new(rpc: &'a LitecoinRpc) -> Self {
        Self { rpc }
    }

    /// Embed `data` (hex) in a new transaction and broadcast it.
    pub async fn register(&self, data: &str) -> Result<RegisterAssetResponse, LitecoinError> {
        if data.len() > MAX_PAYLOAD_HEX_LEN {
            return Err(LitecoinError::PayloadTooLarge { len: data.len() });
        }

        let unspent: Vec<UnspentOutput> = self
            .rpc
            .wallet_call("listunspent", json!([1, 9_999_999]))
            .await?;

        let funding = select_funding_output(&unspent)?;
        let outputs: Vec<_> = build_outputs(data, funding)
            .iter()
            .map(DraftOutput::to_rpc)
            .collect();
        let inputs = [OutPointRef {
            txid: funding.txid.clone(),
            vout: funding.vout,
        }];

        let raw_tx: String = self
            .rpc
            .call("createrawtransaction", json!([inputs, outputs]), RpcScope::Node)
            .await?;

        let signed: SignedTransaction = self
            .rpc
            .wallet_call("signrawtransactionwithwallet", json!([raw_tx]))
            .await?;

        if !signed.complete {
            return Err(LitecoinError::IncompleteSignature);
        }

        let tx_id: String = self
            .rpc
            .call("sendrawtransaction", json!([signed.hex]), RpcScope::Node)
            .await?;

        tracing::info!(
            network = %self.rpc.network(),
            tx_id = %tx_id,
            data_length = data.len(),
            funding_txid = %funding.txid,
            funding_vout = funding.vout,
            "Asset registered on Litecoin blockchain"
        );

        Ok(RegisterAssetResponse {
            asset_id: tx_id.clone(),
            tx_id,
        })
    }

    /// Fetch a registration transaction and return its embedded data.
    pub async fn verify(&self, tx_id: &str) -> Result<VerifyAssetResponse, LitecoinError> {
        let record = self.fetch(tx_id).await?;

        let output = record
            .vout
            .iter()
            .find(|out| out.script_pub_key.script_type == NULL_DATA_SCRIPT_TYPE)
            .ok_or(LitecoinError::NoEmbeddedData)?;

        let data = extract_embedded_data(&output.script_pub_key.hex)?;

        Ok(VerifyAssetResponse {
            valid: record.confirmations >= 1,
            timestamp: record
                .blocktime
                .or(record.time)
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            data: hex::encode(data),
            confirmations: record.confirmations,
        })
    }

    /// Lightweight existence check: true once the transaction has at least
    /// one confirmation. Every failure resolves to `false`.
    pub async fn verify_transaction(&self, tx_id: &str) -> bool {
        match self.fetch(tx_id).await {
            Ok(record) => record.confirmations >= 1,
            Err(e) => {
                tracing::debug!(tx_id, error = %e, "Transaction lookup failed, reporting invalid");
                false
            }
        }
    }

    async fn fetch(&self, tx_id: &str) -> Result<RawTransactionRecord, LitecoinError> {
        Ok(self
            .rpc
            .call("getrawtransaction", json!([tx_id, true]), RpcScope::Node)
            .await?)
    }
}

/// First output, in node order, that can pay the registration fee.
pub fn select_funding_output(unspent: &[UnspentOutput]) -> Result<&UnspentOutput, LitecoinError> {
    if unspent.is_empty() {
        return Err(LitecoinError::NoFundsAvailable);
    }

    unspent
        .iter()
        .find(|utxo| utxo.amount >= REGISTRATION_FEE)
        .ok_or(LitecoinError::InsufficientUtxo)
}

/// Outputs for a registration spending `funding`: data first, then change.
pub fn build_outputs(data: &str, funding: &UnspentOutput) -> Vec<DraftOutput> {
    let mut outputs = vec![DraftOutput::Data(data.to_string())];

    let change = funding
        .amount
        .checked_sub(REGISTRATION_FEE)
        .unwrap_or(Amount::ZERO);

    if change > DUST_THRESHOLD {
        outputs.push(DraftOutput::Payment {
            address: funding.address.clone(),
            amount: change,
        });
    }

    outputs
}

/// Bytes pushed after `OP_RETURN` in a null-data script.
///
/// Handles direct pushes, `OP_PUSHDATA1/2/4` and the small-integer opcodes
/// (`OP_1NEGATE`, `OP_1`..`OP_16`, pushed as their one-byte script number);
/// multiple pushes are concatenated.
pub fn extract_embedded_data(script_hex: &str) -> Result<Vec<u8>, LitecoinError> {
    let script = ScriptBuf::from_hex(script_hex).map_err(|_| LitecoinError::NoEmbeddedData)?;
    let mut instructions = script.instructions();

    match instructions.next() {
        Some(Ok(Instruction::Op(op))) if op == OP_RETURN => {}
        _ => return Err(LitecoinError::NoEmbeddedData),
    }

    let mut data = Vec::new();
    for instruction in instructions {
        match instruction {
            Ok(Instruction::PushBytes(bytes)) => data.extend_from_slice(bytes.as_bytes()),
            Ok(Instruction::Op(op)) => match op.classify(ClassifyContext::Legacy) {
                Class::PushNum(n) => data.push(small_int_byte(n)),
                _ => return Err(LitecoinError::NoEmbeddedData),
            },
            Err(_) => return Err(LitecoinError::NoEmbeddedData),
        }
    }

    Ok(data)
}

/// Minimal script-number encoding of `OP_1NEGATE` and `OP_1`..`OP_16`.
fn small_int_byte(n: i32) -> u8 {
    match n {
        -1 => 0x81,
        n => n.clamp(0, 16) as u8,
    }
}
