// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana account addresses and program-derived addresses.

use std::{fmt, str::FromStr};

use borsh::{BorshDeserialize, BorshSerialize};
use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};

use super::error::SolanaError;

pub const PUBKEY_BYTES: usize = 32;
const MAX_SEED_LEN: usize = 32;
const MAX_SEEDS: usize = 16;
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// The System Program (`11111111111111111111111111111111`).
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey([0u8; PUBKEY_BYTES]);

/// A 32-byte account address, base58 on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// Whether the bytes decode to a point on the ed25519 curve. Program
    /// derived addresses never are, so no private key can sign for them.
    pub fn is_on_curve(&self) -> bool {
        CompressedEdwardsY(self.0).decompress().is_some()
    }

    /// Derive the address for `seeds` with an explicit bump. `None` when the
    /// result lands on the curve or the seeds are out of bounds.
    pub fn create_program_address(seeds: &[&[u8]], bump: u8, program_id: &Pubkey) -> Option<Pubkey> {
        if seeds.len() >= MAX_SEEDS || seeds.iter().any(|seed| seed.len() > MAX_SEED_LEN) {
            return None;
        }

        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        hasher.update([bump]);
        hasher.update(program_id.as_bytes());
        hasher.update(PDA_MARKER);

        let candidate = Pubkey(hasher.finalize().into());
        (!candidate.is_on_curve()).then_some(candidate)
    }

    /// Find the canonical program-derived address: the first bump, counting
    /// down from 255, whose derivation is off the curve.
    pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Option<(Pubkey, u8)> {
        (0..=u8::MAX)
            .rev()
            .find_map(|bump| Self::create_program_address(seeds, bump, program_id).map(|pda| (pda, bump)))
    }
}

impl FromStr for Pubkey {
    type Err = SolanaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| SolanaError::InvalidAddress(format!("{s}: {e}")))?;

        let bytes: [u8; PUBKEY_BYTES] = bytes.try_into().map_err(|raw: Vec<u8>| {
            SolanaError::InvalidAddress(format!("{s}: expected 32 bytes, found {}", raw.len()))
        })?;

        Ok(Pubkey(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}
