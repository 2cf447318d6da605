// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana integration: balances, native transfers and the license program.

pub mod client;
pub mod error;
pub mod keypair;
pub mod license;
pub mod pubkey;
pub mod service;
pub mod transaction;
pub mod types;

pub use error::{KeypairError, SolanaError};
pub use pubkey::Pubkey;
pub use service::SolanaService;
