// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_api_key, API_KEY_HEADER},
    error::{ErrorBody, FieldError},
    litecoin::types::{
        CreatedWallet, LitecoinBalanceResponse, LitecoinTransferResponse, NetworkInfoResponse,
        RegisterAssetResponse, VerifyAssetResponse,
    },
    models::{
        CreateLicenseRequest, CreateWalletRequest, RegisterAssetRequest, RenewLicenseRequest,
        SendLitecoinRequest, SolanaTransferRequest, VerifyTransactionRequest,
        VerifyTransactionResponse,
    },
    network::Network,
    rate_limit::rate_limit,
    solana::types::{
        CreateLicenseResponse, LicenseStateResponse, RenewLicenseResponse, SolanaBalanceResponse,
        SolanaTransferResponse,
    },
    state::AppState,
};

pub mod health;
pub mod litecoin;
pub mod solana;

pub fn router(state: AppState) -> Router {
    let litecoin_routes = Router::new()
        .route("/network", get(litecoin::network_info))
        .route("/balance/{address}", get(litecoin::get_balance))
        .route("/create-wallet", post(litecoin::create_wallet))
        .route("/send", post(litecoin::send))
        .route("/verify", post(litecoin::verify_transaction))
        .route("/register-asset", post(litecoin::register_asset))
        .route("/verify-asset/{txId}", get(litecoin::verify_asset));

    let solana_routes = Router::new()
        .route("/balance/{address}", get(solana::get_balance))
        .route("/transfer", post(solana::transfer))
        .route("/create-license", post(solana::create_license))
        .route("/renew-license", post(solana::renew_license))
        .route("/license/{address}", get(solana::license_state));

    let v1_routes = Router::new()
        .nest("/litecoin", litecoin_routes)
        .nest("/solana", solana_routes)
        .layer(from_fn_with_state(state.clone(), require_api_key));

    // Layers run outermost-last: request ids are assigned before tracing,
    // and the rate limit applies before the API-key check.
    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

struct ApiKeyAddon;

impl Modify for ApiKeyAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        litecoin::network_info,
        litecoin::get_balance,
        litecoin::create_wallet,
        litecoin::send,
        litecoin::verify_transaction,
        litecoin::register_asset,
        litecoin::verify_asset,
        solana::get_balance,
        solana::transfer,
        solana::create_license,
        solana::renew_license,
        solana::license_state
    ),
    components(
        schemas(
            health::HealthResponse,
            ErrorBody,
            FieldError,
            Network,
            CreateWalletRequest,
            SendLitecoinRequest,
            VerifyTransactionRequest,
            RegisterAssetRequest,
            SolanaTransferRequest,
            CreateLicenseRequest,
            RenewLicenseRequest,
            NetworkInfoResponse,
            LitecoinBalanceResponse,
            CreatedWallet,
            LitecoinTransferResponse,
            VerifyTransactionResponse,
            RegisterAssetResponse,
            VerifyAssetResponse,
            SolanaBalanceResponse,
            SolanaTransferResponse,
            CreateLicenseResponse,
            RenewLicenseResponse,
            LicenseStateResponse
        )
    ),
    modifiers(&ApiKeyAddon),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Litecoin", description = "Litecoin wallet and asset anchoring"),
        (name = "Solana", description = "Solana transfers and software licenses")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::litecoin::{rpc::test_support::*, LitecoinService};
    use crate::network::{NetworkPair, NetworkSlot};
    use crate::solana::SolanaService;
    use crate::state::test_support::{config, state};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use mockito::{Matcher, Server};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const TX_ID: &str = "9f0c3a1e5b7d2f4a6c8e0b1d3f5a7c9e1b3d5f7a9c1e3b5d7f9a1c3e5b7d9f0a";

    fn get(uri: &str, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(key) = key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(API_KEY_HEADER, "test-key")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public_and_bare() {
        let response = router(state("test")).oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body.get("success").is_none());
        assert!(body["uptime"].is_number());
    }

    #[tokio::test]
    async fn api_routes_require_key() {
        for key in [None, Some("wrong-key")] {
            let response = router(state("test"))
                .oneshot(get("/api/v1/litecoin/network", key))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body = json_body(response).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Unauthorized: Invalid or missing API key");
        }
    }

    #[tokio::test]
    async fn invalid_body_returns_validation_envelope() {
        let response = router(state("test"))
            .oneshot(post_json(
                "/api/v1/litecoin/send",
                json!({ "destinationAddress": "short", "amount": -1 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Validation Error");
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["destinationAddress", "amount"]);
    }

    #[tokio::test]
    async fn malformed_path_params_are_rejected() {
        let app = router(state("test"));

        let response = app
            .clone()
            .oneshot(get("/api/v1/litecoin/verify-asset/not-a-txid", Some("test-key")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["details"][0]["field"], "txId");

        let response = app
            .oneshot(get("/api/v1/solana/balance/0OIl", Some("test-key")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn solana_input_the_chain_would_reject_is_a_validation_error() {
        let app = router(state("test"));

        // Base58 and 32 characters long, but only 23 bytes.
        let short_key = "2".repeat(32);
        let response = app
            .clone()
            .oneshot(get(
                &format!("/api/v1/solana/balance/{short_key}?useTestnet=true"),
                Some("test-key"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["details"][0]["field"], "address");

        let response = app
            .oneshot(post_json(
                "/api/v1/solana/transfer",
                json!({
                    "toAddress": "BTQyLHZd6PPTu5jY2wWUxxYAmWKRVyadSMZwhLmX4gvn",
                    "amount": 1e-12,
                    "useTestnet": true
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"], "Validation Error");
        assert_eq!(body["details"][0]["field"], "amount");
    }

    #[tokio::test]
    async fn license_lookup_requires_name() {
        let response = router(state("test"))
            .oneshot(get(
                "/api/v1/solana/license/BTQyLHZd6PPTu5jY2wWUxxYAmWKRVyadSMZwhLmX4gvn",
                Some("test-key"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Validation Error");
    }

    #[tokio::test]
    async fn unconfigured_network_is_a_server_error() {
        let response = router(state("test"))
            .oneshot(get("/api/v1/litecoin/network?useTestnet=true", Some("test-key")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("Litecoin testnet is not configured"));
    }

    #[tokio::test]
    async fn production_hides_failure_details() {
        let response = router(state("production"))
            .oneshot(get(&format!("/api/v1/litecoin/verify-asset/{TX_ID}"), Some("test-key")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"], "Internal Server Error");
    }

    #[tokio::test]
    async fn verify_reports_false_when_node_unreachable() {
        let response = router(state("test"))
            .oneshot(post_json("/api/v1/litecoin/verify", json!({ "txId": TX_ID })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["valid"], false);
    }

    #[tokio::test]
    async fn rate_limit_applies_before_auth() {
        let app = router(AppState::new(config("test", 1)));

        let first = app.clone().oneshot(get("/health", None)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(get("/api/v1/litecoin/network", None))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            json_body(second).await["error"],
            "Too many requests, please try again later."
        );
    }

    #[tokio::test]
    async fn create_wallet_round_trip_through_mock_node() {
        let mut server = Server::new_async().await;
        let new_address = server
            .mock("POST", WALLET_PATH)
            .match_body(Matcher::PartialJson(json!({ "method": "getnewaddress" })))
            .with_body(ok_body(json!("tltc1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx")))
            .expect(1)
            .create_async()
            .await;
        let dump_key = server
            .mock("POST", WALLET_PATH)
            .match_body(Matcher::PartialJson(json!({
                "method": "dumpprivkey",
                "params": ["tltc1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx"]
            })))
            .with_body(ok_body(json!("cVt4o7BGAig1UXywgGSmARhxMdzP5qvQsxKkSsc1XEkw3tDTQFpy")))
            .expect(1)
            .create_async()
            .await;

        let litecoin = LitecoinService::new(NetworkPair::new(
            NetworkSlot::Ready(client_for(&server.url())),
            NetworkSlot::unconfigured("no RPC endpoint configured for Litecoin mainnet"),
        ));
        let solana = SolanaService::new(
            NetworkPair::new(
                NetworkSlot::unconfigured("no RPC endpoint configured for Solana testnet"),
                NetworkSlot::unconfigured("no RPC endpoint configured for Solana mainnet"),
            ),
            365,
        );
        let app = router(AppState::with_services(config("test", 100), litecoin, solana));

        let response = app
            .oneshot(post_json("/api/v1/litecoin/create-wallet", json!({ "useTestnet": true })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["address"], "tltc1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx");
        assert_eq!(
            body["data"]["privateKey"],
            "cVt4o7BGAig1UXywgGSmARhxMdzP5qvQsxKkSsc1XEkw3tDTQFpy"
        );

        new_address.assert_async().await;
        dump_key.assert_async().await;
    }

    #[test]
    fn openapi_documents_api_key_scheme() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(doc["components"]["securitySchemes"]["api_key"]["name"], "x-api-key");
        assert!(doc["paths"]["/api/v1/litecoin/verify-asset/{txId}"].is_object());
    }
}
