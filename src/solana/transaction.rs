// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Legacy transaction assembly: instructions, message compilation, signing
//! and wire serialization.
//!
//! Wire layout of a signed transaction:
//!
//! ```text
//! compact-u16 n | n × 64-byte signatures | message
//! message = header[3] | compact keys | recent blockhash[32] | compact instructions
//! ```

use ed25519_dalek::{Signer, SigningKey};

use super::error::SolanaError;
use super::keypair::pubkey_of;
use super::pubkey::{Pubkey, SYSTEM_PROGRAM_ID};

/// System Program instruction index for a lamport transfer.
const SYSTEM_TRANSFER_INDEX: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// System Program transfer of `lamports` from `from` to `to`.
pub fn system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::writable(*from, true), AccountMeta::writable(*to, false)],
        data,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile `instructions` into a legacy message paid for by `payer`.
    ///
    /// Accounts are deduplicated with their signer and writable flags
    /// merged, then ordered: writable signers (payer first), readonly
    /// signers, writable non-signers, readonly non-signers.
    pub fn compile(
        payer: &Pubkey,
        instructions: &[Instruction],
        recent_blockhash: [u8; 32],
    ) -> Result<Self, SolanaError> {
        let mut metas: Vec<AccountMeta> = vec![AccountMeta::writable(*payer, true)];

        let mut merge = |meta: AccountMeta| match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
            Some(existing) => {
                existing.is_signer |= meta.is_signer;
                existing.is_writable |= meta.is_writable;
            }
            None => metas.push(meta),
        };

        for ix in instructions {
            for meta in &ix.accounts {
                merge(*meta);
            }
            merge(AccountMeta::readonly(ix.program_id, false));
        }

        // Stable: the payer stays ahead of other writable signers.
        metas.sort_by_key(|m| (!m.is_signer, !m.is_writable));

        let count = |signer: bool, writable: bool| {
            metas
                .iter()
                .filter(|m| m.is_signer == signer && m.is_writable == writable)
                .count()
        };
        let header = MessageHeader {
            num_required_signatures: to_u8(metas.iter().filter(|m| m.is_signer).count())?,
            num_readonly_signed_accounts: to_u8(count(true, false))?,
            num_readonly_unsigned_accounts: to_u8(count(false, false))?,
        };

        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| -> Result<u8, SolanaError> {
            let position = account_keys
                .iter()
                .position(|k| k == key)
                .ok_or_else(|| SolanaError::InvalidResponse(format!("account {key} missing from message")))?;
            to_u8(position)
        };

        let instructions = instructions
            .iter()
            .map(|ix| {
                Ok(CompiledInstruction {
                    program_id_index: index_of(&ix.program_id)?,
                    accounts: ix
                        .accounts
                        .iter()
                        .map(|m| index_of(&m.pubkey))
                        .collect::<Result<_, _>>()?,
                    data: ix.data.clone(),
                })
            })
            .collect::<Result<_, SolanaError>>()?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    pub fn serialize(&self) -> Result<Vec<u8>, SolanaError> {
        let mut out = vec![
            self.header.num_required_signatures,
            self.header.num_readonly_signed_accounts,
            self.header.num_readonly_unsigned_accounts,
        ];

        encode_length(self.account_keys.len(), &mut out)?;
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }

        out.extend_from_slice(&self.recent_blockhash);

        encode_length(self.instructions.len(), &mut out)?;
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_length(ix.accounts.len(), &mut out)?;
            out.extend_from_slice(&ix.accounts);
            encode_length(ix.data.len(), &mut out)?;
            out.extend_from_slice(&ix.data);
        }

        Ok(out)
    }

    /// Sign with `signers` and return the wire-format transaction with its
    /// first signature (the transaction id), base58 encoded.
    pub fn sign(&self, signers: &[&SigningKey]) -> Result<(Vec<u8>, String), SolanaError> {
        let message = self.serialize()?;
        let required = usize::from(self.header.num_required_signatures);

        let signatures = self.account_keys[..required]
            .iter()
            .map(|key| {
                signers
                    .iter()
                    .find(|s| pubkey_of(s) == *key)
                    .map(|s| s.sign(&message).to_bytes())
                    .ok_or_else(|| SolanaError::InvalidResponse(format!("no signer supplied for {key}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = Vec::with_capacity(1 + signatures.len() * 64 + message.len());
        encode_length(signatures.len(), &mut tx)?;
        for signature in &signatures {
            tx.extend_from_slice(signature);
        }
        tx.extend_from_slice(&message);

        let id = signatures
            .first()
            .map(|s| bs58::encode(s).into_string())
            .unwrap_or_default();

        Ok((tx, id))
    }
}

fn to_u8(n: usize) -> Result<u8, SolanaError> {
    u8::try_from(n).map_err(|_| SolanaError::InvalidResponse(format!("too many accounts in message ({n})")))
}

/// Append a "compact-u16" (7 bits per byte, high bit = continuation).
pub fn encode_compact_u16(mut value: u16, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

fn to_u16(n: usize) -> Result<u16, SolanaError> {
    u16::try_from(n).map_err(|_| SolanaError::InvalidResponse(format!("length {n} exceeds compact-u16 range")))
}

fn encode_length(len: usize, out: &mut Vec<u8>) -> Result<(), SolanaError> {
    encode_compact_u16(to_u16(len)?, out);
    Ok(())
}
