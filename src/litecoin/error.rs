// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::network::Network;

use super::rpc::RpcError;

/// Errors raised by the Litecoin service layer.
#[derive(Debug, thiserror::Error)]
pub enum LitecoinError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("Data exceeds OP_RETURN limit of 80 bytes ({len} hex characters supplied)")]
    PayloadTooLarge { len: usize },

    #[error("No unspent outputs available to fund transaction")]
    NoFundsAvailable,

    #[error("No UTXO with sufficient balance for transaction fee")]
    InsufficientUtxo,

    #[error("Transaction signing incomplete")]
    IncompleteSignature,

    #[error("No OP_RETURN data found in transaction")]
    NoEmbeddedData,

    #[error("Litecoin {0} is not configured: {1}")]
    NetworkNotConfigured(Network, String),

    #[error("Invalid node response: {0}")]
    InvalidResponse(String),
}
