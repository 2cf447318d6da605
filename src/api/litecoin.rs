// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Litecoin API endpoints.
//!
//! Every endpoint picks its node with `useTestnet` (body or query string,
//! mainnet when absent). Node failures come back as 500.

use axum::extract::{Path, State};

use crate::{
    error::ApiError,
    litecoin::types::{
        CreatedWallet, LitecoinBalanceResponse, LitecoinTransferResponse, NetworkInfoResponse,
        RegisterAssetResponse, VerifyAssetResponse,
    },
    models::{
        is_litecoin_address, is_tx_id, ApiResponse, Checks, CreateWalletRequest, NetworkQuery,
        RegisterAssetRequest, SendLitecoinRequest, ValidJson, ValidQuery, VerifyTransactionRequest,
        VerifyTransactionResponse,
    },
    network::Network,
    state::AppState,
};

/// Node version and peer count.
#[utoipa::path(
    get,
    path = "/api/v1/litecoin/network",
    tag = "Litecoin",
    security(("api_key" = [])),
    params(NetworkQuery),
    responses(
        (status = 200, description = "Node network info", body = NetworkInfoResponse),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Node unavailable")
    )
)]
pub async fn network_info(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<NetworkQuery>,
) -> Result<ApiResponse<NetworkInfoResponse>, ApiError> {
    state
        .litecoin
        .network_info(query.network())
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("litecoin.network", e))
}

/// Confirmed and pending amount received by an address.
#[utoipa::path(
    get,
    path = "/api/v1/litecoin/balance/{address}",
    tag = "Litecoin",
    security(("api_key" = [])),
    params(
        ("address" = String, Path, description = "Litecoin address"),
        NetworkQuery
    ),
    responses(
        (status = 200, description = "Address balance", body = LitecoinBalanceResponse),
        (status = 400, description = "Invalid address"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Node error")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
    ValidQuery(query): ValidQuery<NetworkQuery>,
) -> Result<ApiResponse<LitecoinBalanceResponse>, ApiError> {
    Checks::new()
        .require(is_litecoin_address(&address), "address", "must be between 26 and 90 characters")
        .finish()
        .map_err(ApiError::validation)?;

    state
        .litecoin
        .get_balance(query.network(), &address)
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("litecoin.balance", e))
}

/// Create a new address in the managed wallet.
///
/// The response carries the address's private key in WIF.
#[utoipa::path(
    post,
    path = "/api/v1/litecoin/create-wallet",
    tag = "Litecoin",
    security(("api_key" = [])),
    request_body = CreateWalletRequest,
    responses(
        (status = 200, description = "Address created", body = CreatedWallet),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Node error")
    )
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateWalletRequest>,
) -> Result<ApiResponse<CreatedWallet>, ApiError> {
    state
        .litecoin
        .create_wallet(Network::from_testnet_flag(request.use_testnet))
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("litecoin.create_wallet", e))
}

/// Send LTC from the managed wallet.
#[utoipa::path(
    post,
    path = "/api/v1/litecoin/send",
    tag = "Litecoin",
    security(("api_key" = [])),
    request_body = SendLitecoinRequest,
    responses(
        (status = 200, description = "Transaction broadcast", body = LitecoinTransferResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Node error")
    )
)]
pub async fn send(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SendLitecoinRequest>,
) -> Result<ApiResponse<LitecoinTransferResponse>, ApiError> {
    state
        .litecoin
        .send(
            Network::from_testnet_flag(request.use_testnet),
            &request.destination_address,
            request.amount,
        )
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("litecoin.send", e))
}

/// Whether a transaction is known to the wallet or the node and confirmed.
///
/// Lookup failures report `valid: false` rather than an error.
#[utoipa::path(
    post,
    path = "/api/v1/litecoin/verify",
    tag = "Litecoin",
    security(("api_key" = [])),
    request_body = VerifyTransactionRequest,
    responses(
        (status = 200, description = "Verification result", body = VerifyTransactionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid API key")
    )
)]
pub async fn verify_transaction(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<VerifyTransactionRequest>,
) -> ApiResponse<VerifyTransactionResponse> {
    let valid = state
        .litecoin
        .verify_transaction(Network::from_testnet_flag(request.use_testnet), &request.tx_id)
        .await;

    ApiResponse::ok(VerifyTransactionResponse { valid })
}

/// Anchor up to 80 bytes of data in an OP_RETURN output.
#[utoipa::path(
    post,
    path = "/api/v1/litecoin/register-asset",
    tag = "Litecoin",
    security(("api_key" = [])),
    request_body = RegisterAssetRequest,
    responses(
        (status = 200, description = "Asset registered", body = RegisterAssetResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "No spendable output or node error")
    )
)]
pub async fn register_asset(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterAssetRequest>,
) -> Result<ApiResponse<RegisterAssetResponse>, ApiError> {
    state
        .litecoin
        .register_asset(Network::from_testnet_flag(request.use_testnet), &request.data)
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("litecoin.register_asset", e))
}

/// Read back the data anchored by a registration transaction.
#[utoipa::path(
    get,
    path = "/api/v1/litecoin/verify-asset/{txId}",
    tag = "Litecoin",
    security(("api_key" = [])),
    params(
        ("txId" = String, Path, description = "Registration transaction id (64 hex characters)"),
        NetworkQuery
    ),
    responses(
        (status = 200, description = "Anchored data", body = VerifyAssetResponse),
        (status = 400, description = "Invalid transaction id"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Unknown transaction or no data output")
    )
)]
pub async fn verify_asset(
    State(state): State<AppState>,
    Path(tx_id): Path<String>,
    ValidQuery(query): ValidQuery<NetworkQuery>,
) -> Result<ApiResponse<VerifyAssetResponse>, ApiError> {
    Checks::new()
        .require(is_tx_id(&tx_id), "txId", "must be 64 hex characters")
        .finish()
        .map_err(ApiError::validation)?;

    state
        .litecoin
        .verify_asset(query.network(), &tx_id)
        .await
        .map(ApiResponse::ok)
        .map_err(|e| state.service_error("litecoin.verify_asset", e))
}
