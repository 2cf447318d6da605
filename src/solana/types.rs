// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana API response types.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolanaBalanceResponse {
    pub address: String,
    /// Balance in SOL.
    pub balance: f64,
    pub lamports: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolanaTransferResponse {
    pub signature: String,
    pub from: String,
    pub to: String,
    /// Amount in SOL.
    pub amount: f64,
    /// Slot observed after submission.
    pub slot: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLicenseResponse {
    /// Address of the license account.
    pub mint_address: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewLicenseResponse {
    pub license_address: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LicenseStateResponse {
    pub license_address: String,
    pub owner: String,
    pub authority: String,
    /// Decimal string; ids use the full u64 range.
    pub software_id: String,
    /// Unix seconds.
    pub purchase_timestamp: i64,
    /// Unix seconds.
    pub expiration_timestamp: i64,
    pub is_active: bool,
    /// Active and not yet expired at the time of the query.
    pub is_valid: bool,
}
