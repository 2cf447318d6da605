// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana API endpoints: balances, SOL transfers and software licenses.

use axum::extract::{Path, State};

use crate::{
    error::ApiError,
    models::{
        is_solana_address, ApiResponse, Checks, CreateLicenseRequest, LicenseQuery, NetworkQuery,
        RenewLicenseRequest, SolanaTransferRequest, ValidJson, ValidQuery,
    },
    network::Network,
    solana::types::{
        CreateLicenseResponse, LicenseStateResponse, RenewLicenseResponse, SolanaBalanceResponse,
        SolanaTransferResponse,
    },
    state::AppState,
};

fn check_address(address: &str) -> Result<(), ApiError> {
    Checks::new()
        .require(is_solana_address(address), "address", "must be a base58 address")
        .finish()
        .map_err(ApiError::validation)
}

/// Balance of an account, in SOL and lamports.
#[utoipa::path(
    get,
    path = "/api/v1/solana/balance/{address}",
    tag = "Solana",
    security(("api_key" = [])),
    params(
        ("address" = String, Path, description = "Base58 account address"),
        NetworkQuery
    ),
    responses(
        (status = 200, description = "Account balance", body = SolanaBalanceResponse),
        (status = 400, description = "Invalid address"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Cluster error")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
    ValidQuery(query): ValidQuery<NetworkQuery>,
) -> Result<ApiResponse<SolanaBalanceResponse>, ApiError> {
    check_address(&address)?;

    state
        .solana
        .get_balance(query.network(), &address)
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("solana.balance", e))
}

/// Transfer SOL from the master wallet.
#[utoipa::path(
    post,
    path = "/api/v1/solana/transfer",
    tag = "Solana",
    security(("api_key" = [])),
    request_body = SolanaTransferRequest,
    responses(
        (status = 200, description = "Transfer submitted", body = SolanaTransferResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Cluster error or master wallet not loaded")
    )
)]
pub async fn transfer(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SolanaTransferRequest>,
) -> Result<ApiResponse<SolanaTransferResponse>, ApiError> {
    state
        .solana
        .transfer(
            Network::from_testnet_flag(request.use_testnet),
            &request.to_address,
            request.amount,
        )
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("solana.transfer", e))
}

/// Issue a software license to a wallet.
#[utoipa::path(
    post,
    path = "/api/v1/solana/create-license",
    tag = "Solana",
    security(("api_key" = [])),
    request_body = CreateLicenseRequest,
    responses(
        (status = 200, description = "License issued", body = CreateLicenseResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Cluster error or license program not configured")
    )
)]
pub async fn create_license(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateLicenseRequest>,
) -> Result<ApiResponse<CreateLicenseResponse>, ApiError> {
    state
        .solana
        .create_license(
            Network::from_testnet_flag(request.use_testnet),
            &request.recipient_address,
            &request.name,
            &request.uri,
        )
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("solana.create_license", e))
}

/// Extend an existing license.
#[utoipa::path(
    post,
    path = "/api/v1/solana/renew-license",
    tag = "Solana",
    security(("api_key" = [])),
    request_body = RenewLicenseRequest,
    responses(
        (status = 200, description = "License renewed", body = RenewLicenseResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Unknown license or cluster error")
    )
)]
pub async fn renew_license(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RenewLicenseRequest>,
) -> Result<ApiResponse<RenewLicenseResponse>, ApiError> {
    state
        .solana
        .renew_license(
            Network::from_testnet_flag(request.use_testnet),
            &request.owner_address,
            &request.name,
            request.duration_days,
        )
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("solana.renew_license", e))
}

/// Current state of the license held by `address` for product `name`.
#[utoipa::path(
    get,
    path = "/api/v1/solana/license/{address}",
    tag = "Solana",
    security(("api_key" = [])),
    params(
        ("address" = String, Path, description = "License owner address"),
        LicenseQuery
    ),
    responses(
        (status = 200, description = "License state", body = LicenseStateResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Unknown license or cluster error")
    )
)]
pub async fn license_state(
    State(state): State<AppState>,
    Path(address): Path<String>,
    ValidQuery(query): ValidQuery<LicenseQuery>,
) -> Result<ApiResponse<LicenseStateResponse>, ApiError> {
    check_address(&address)?;

    state
        .solana
        .license_state(Network::from_testnet_flag(query.use_testnet), &address, &query.name)
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("solana.license", e))
}
