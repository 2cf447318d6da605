// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::PathBuf;

use crate::network::Network;

/// Errors raised by the Solana layer.
#[derive(Debug, thiserror::Error)]
pub enum SolanaError {
    /// The cluster answered with a JSON-RPC error object.
    #[error("Solana RPC error: {message} (code: {code})")]
    Rpc { code: i64, message: String },

    #[error("Solana RPC request failed: {0}")]
    Transport(String),

    #[error("Invalid Solana address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Signing was requested on a network without a loaded master keypair.
    #[error("Master wallet not loaded for Solana {0}: {1}")]
    SignerUnavailable(Network, String),

    #[error("Solana {0} is not configured: {1}")]
    NetworkNotConfigured(Network, String),

    #[error("License account not found: {0}")]
    LicenseNotFound(String),

    #[error("Invalid Solana RPC response: {0}")]
    InvalidResponse(String),
}

/// Errors loading a Solana CLI keyfile.
#[derive(Debug, thiserror::Error)]
pub enum KeypairError {
    #[error("Failed to read keypair file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Keypair file {path} is not a JSON byte array: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Keypair must be 64 bytes, found {0}")]
    Length(usize),

    #[error("Keypair secret and public halves do not match")]
    Mismatch,
}
