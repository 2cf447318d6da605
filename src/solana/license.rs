// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client side of the on-chain license program.
//!
//! A license lives in a PDA seeded by `["license", owner, software_id_le]`.
//! Instructions are Anchor encoded: an 8-byte discriminator followed by the
//! borsh-serialized arguments.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

use super::error::SolanaError;
use super::pubkey::{Pubkey, SYSTEM_PROGRAM_ID};
use super::transaction::{AccountMeta, Instruction};

const LICENSE_SEED: &[u8] = b"license";
const ISSUE_LICENSE_DISCRIMINATOR: [u8; 8] = [5, 103, 183, 220, 230, 209, 57, 154];
const RENEW_LICENSE_DISCRIMINATOR: [u8; 8] = [104, 243, 122, 253, 203, 203, 199, 64];
const LICENSE_ACCOUNT_DISCRIMINATOR: [u8; 8] = [120, 20, 28, 217, 130, 168, 223, 118];

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Stable numeric id for a software product: the first 8 bytes of
/// SHA-256(name), little endian.
pub fn software_id(name: &str) -> u64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

/// Address of the license account for `owner` and `software_id`.
pub fn license_address(owner: &Pubkey, software_id: u64, program_id: &Pubkey) -> Result<(Pubkey, u8), SolanaError> {
    let id = software_id.to_le_bytes();
    Pubkey::find_program_address(&[LICENSE_SEED, owner.as_bytes(), &id], program_id)
        .ok_or_else(|| SolanaError::InvalidAddress(format!("no program address for license owned by {owner}")))
}

#[derive(BorshSerialize)]
struct IssueLicenseArgs {
    software_id: u64,
    duration_seconds: i64,
}

#[derive(BorshSerialize)]
struct RenewLicenseArgs {
    duration_seconds: i64,
}

fn anchor_data<T: BorshSerialize>(discriminator: [u8; 8], args: &T) -> Result<Vec<u8>, SolanaError> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)
        .map_err(|e| SolanaError::InvalidResponse(format!("failed to encode instruction: {e}")))?;
    Ok(data)
}

/// `issue_license`: create the license PDA for `owner`, paid by `authority`.
pub fn issue_license(
    program_id: &Pubkey,
    license: &Pubkey,
    owner: &Pubkey,
    authority: &Pubkey,
    software_id: u64,
    duration_seconds: i64,
) -> Result<Instruction, SolanaError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::writable(*license, false),
            AccountMeta::writable(*owner, false),
            AccountMeta::writable(*authority, true),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: anchor_data(
            ISSUE_LICENSE_DISCRIMINATOR,
            &IssueLicenseArgs {
                software_id,
                duration_seconds,
            },
        )?,
    })
}

/// `renew_license`: extend an existing license. Only its issuing authority
/// may sign.
pub fn renew_license(
    program_id: &Pubkey,
    license: &Pubkey,
    authority: &Pubkey,
    duration_seconds: i64,
) -> Result<Instruction, SolanaError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::writable(*license, false),
            AccountMeta::readonly(*authority, true),
        ],
        data: anchor_data(RENEW_LICENSE_DISCRIMINATOR, &RenewLicenseArgs { duration_seconds })?,
    })
}

/// On-chain license record.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct LicenseAccount {
    pub owner: Pubkey,
    pub authority: Pubkey,
    pub software_id: u64,
    pub purchase_timestamp: i64,
    pub expiration_timestamp: i64,
    pub is_active: bool,
    pub bump: u8,
}

impl LicenseAccount {
    /// Decode account data: discriminator, then the borsh fields. Trailing
    /// bytes (account padding) are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, SolanaError> {
        let body = data
            .strip_prefix(&LICENSE_ACCOUNT_DISCRIMINATOR[..])
            .ok_or_else(|| SolanaError::InvalidResponse("account is not a license account".to_string()))?;

        let mut reader = body;
        Self::deserialize(&mut reader)
            .map_err(|e| SolanaError::InvalidResponse(format!("malformed license account: {e}")))
    }

    #[cfg(test)]
    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut data = LICENSE_ACCOUNT_DISCRIMINATOR.to_vec();
        borsh::to_writer(&mut data, self).unwrap();
        data
    }
}
