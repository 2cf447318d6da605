// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request bodies, query strings and the success envelope used by the REST
//! API. Wire names are camelCase.
//!
//! ## Validation
//!
//! Every request type implements [`Validate`]. The [`ValidJson`] and
//! [`ValidQuery`] extractors reject a request with a 400 `"Validation Error"`
//! envelope, listing each offending field, before any handler code runs.

use axum::{
    extract::{FromRequest, FromRequestParts, Json, Query, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, FieldError};
use crate::network::Network;

/// Current time, RFC 3339 with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Envelope
// =============================================================================

/// Success envelope: `{ success: true, data, timestamp }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: now_timestamp(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

// =============================================================================
// Validation
// =============================================================================

pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Collects field failures so every problem is reported at once.
#[derive(Default)]
pub struct Checks(Vec<FieldError>);

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, ok: bool, field: &str, message: &str) -> Self {
        if !ok {
            self.0.push(FieldError::new(field, message));
        }
        self
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn is_litecoin_address(s: &str) -> bool {
    (26..=90).contains(&s.len())
}

pub fn is_tx_id(s: &str) -> bool {
    s.len() == 64 && is_hex(s)
}

/// Base58 text of exactly 32 bytes.
pub fn is_solana_address(s: &str) -> bool {
    (32..=44).contains(&s.len()) && bs58::decode(s).into_vec().is_ok_and(|bytes| bytes.len() == 32)
}

/// Positive and at least one lamport once rounded.
fn is_lamport_amount(amount: f64) -> bool {
    crate::solana::service::sol_to_lamports(amount).is_ok()
}

fn is_positive_amount(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

fn is_absolute_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

/// A JSON body that has been deserialized and validated.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(vec![FieldError::new("body", rejection.body_text())]))?;

        value.validate().map_err(|details| {
            tracing::debug!(?details, "Validation failed");
            ApiError::validation(details)
        })?;

        Ok(ValidJson(value))
    }
}

/// A query string that has been deserialized and validated.
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(vec![FieldError::new("query", rejection.body_text())]))?;

        value.validate().map_err(ApiError::validation)?;

        Ok(ValidQuery(value))
    }
}

// =============================================================================
// Shared
// =============================================================================

/// `?useTestnet=bool`, defaulting to mainnet.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NetworkQuery {
    #[serde(default)]
    pub use_testnet: bool,
}

impl NetworkQuery {
    pub fn network(&self) -> Network {
        Network::from_testnet_flag(self.use_testnet)
    }
}

impl Validate for NetworkQuery {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Ok(())
    }
}

// =============================================================================
// Litecoin
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    #[serde(default)]
    pub use_testnet: bool,
}

impl Validate for CreateWalletRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendLitecoinRequest {
    pub destination_address: String,
    /// Amount in LTC.
    pub amount: f64,
    #[serde(default)]
    pub use_testnet: bool,
}

impl Validate for SendLitecoinRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .require(
                is_litecoin_address(&self.destination_address),
                "destinationAddress",
                "must be between 26 and 90 characters",
            )
            .require(is_positive_amount(self.amount), "amount", "must be greater than 0")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTransactionRequest {
    pub tx_id: String,
    /// Accepted for compatibility; not used in the lookup.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub use_testnet: bool,
}

impl Validate for VerifyTransactionRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .require(is_tx_id(&self.tx_id), "txId", "must be 64 hex characters")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerifyTransactionResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAssetRequest {
    /// Hex payload, at most 80 bytes.
    pub data: String,
    #[serde(default)]
    pub use_testnet: bool,
}

impl Validate for RegisterAssetRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .require(!self.data.is_empty(), "data", "must not be empty")
            .require(
                is_hex(&self.data) && self.data.len() % 2 == 0,
                "data",
                "must be an even-length hex string",
            )
            .require(
                self.data.len() <= crate::litecoin::asset::MAX_PAYLOAD_HEX_LEN,
                "data",
                "must be at most 160 hex characters (80 bytes)",
            )
            .finish()
    }
}

// =============================================================================
// Solana
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolanaTransferRequest {
    pub to_address: String,
    /// Amount in SOL.
    pub amount: f64,
    #[serde(default)]
    pub use_testnet: bool,
}

impl Validate for SolanaTransferRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .require(is_solana_address(&self.to_address), "toAddress", "must be a base58 address")
            .require(
                is_lamport_amount(self.amount),
                "amount",
                "must be at least 0.000000001 SOL (1 lamport)",
            )
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLicenseRequest {
    pub recipient_address: String,
    /// Software product name; determines the license id.
    pub name: String,
    /// Metadata URI, recorded in the service log.
    pub uri: String,
    #[serde(default)]
    pub use_testnet: bool,
}

fn is_license_name(name: &str) -> bool {
    (1..=32).contains(&name.chars().count())
}

impl Validate for CreateLicenseRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .require(
                is_solana_address(&self.recipient_address),
                "recipientAddress",
                "must be a base58 address",
            )
            .require(is_license_name(&self.name), "name", "must be between 1 and 32 characters")
            .require(is_absolute_url(&self.uri), "uri", "must be a valid URL")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewLicenseRequest {
    pub owner_address: String,
    pub name: String,
    pub duration_days: u32,
    #[serde(default)]
    pub use_testnet: bool,
}

impl Validate for RenewLicenseRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .require(is_solana_address(&self.owner_address), "ownerAddress", "must be a base58 address")
            .require(is_license_name(&self.name), "name", "must be between 1 and 32 characters")
            .require(
                (1..=3650).contains(&self.duration_days),
                "durationDays",
                "must be between 1 and 3650",
            )
            .finish()
    }
}

/// `?name=&useTestnet=` for license lookups.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LicenseQuery {
    pub name: String,
    #[serde(default)]
    pub use_testnet: bool,
}

impl Validate for LicenseQuery {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .require(is_license_name(&self.name), "name", "must be between 1 and 32 characters")
            .finish()
    }
}
