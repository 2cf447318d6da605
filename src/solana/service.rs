// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana service facade used by the HTTP layer.
//!
//! Each configured network carries a cluster client, the master keypair
//! that signs transfers and license instructions, and the license program
//! id. Keypairs are loaded once at startup; a missing or unreadable keyfile
//! leaves the signer unavailable without affecting read-only operations.

use std::str::FromStr;

use ed25519_dalek::SigningKey;

use crate::config::{SolanaClusterConfig, SolanaConfig};
use crate::network::{Network, NetworkPair, NetworkSlot};

use super::client::SolanaRpc;
use super::error::SolanaError;
use super::keypair::{load_keypair, pubkey_of};
use super::license::{self, LicenseAccount, SECONDS_PER_DAY};
use super::pubkey::Pubkey;
use super::transaction::{system_transfer, Instruction, Message};
use super::types::{
    CreateLicenseResponse, LicenseStateResponse, RenewLicenseResponse, SolanaBalanceResponse,
    SolanaTransferResponse,
};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Everything needed to act on one Solana network.
#[derive(Debug, Clone)]
pub struct SolanaCluster {
    rpc: SolanaRpc,
    signer: NetworkSlot<SigningKey>,
    license_program: NetworkSlot<Pubkey>,
}

impl SolanaCluster {
    pub fn new(rpc: SolanaRpc, signer: NetworkSlot<SigningKey>, license_program: NetworkSlot<Pubkey>) -> Self {
        Self {
            rpc,
            signer,
            license_program,
        }
    }

    fn from_config(network: Network, config: &SolanaClusterConfig, commitment: &str) -> Result<Self, SolanaError> {
        let rpc = SolanaRpc::new(network, &config.rpc_url, commitment)?;

        let signer = match &config.wallet_path {
            None => NetworkSlot::unconfigured("no master wallet path configured"),
            Some(path) => match load_keypair(path) {
                Ok(key) => {
                    tracing::info!(%network, pubkey = %pubkey_of(&key), "Master wallet loaded");
                    NetworkSlot::Ready(key)
                }
                Err(e) => {
                    tracing::warn!(%network, error = %e, "Master wallet unavailable. Signing operations will fail");
                    NetworkSlot::unconfigured(e.to_string())
                }
            },
        };

        let license_program = match &config.license_program_id {
            None => NetworkSlot::unconfigured("no license program id configured"),
            Some(id) => match Pubkey::from_str(id) {
                Ok(program) => NetworkSlot::Ready(program),
                Err(e) => {
                    tracing::warn!(%network, error = %e, "License program id is invalid");
                    NetworkSlot::unconfigured(e.to_string())
                }
            },
        };

        Ok(Self::new(rpc, signer, license_program))
    }

    fn signer(&self) -> Result<&SigningKey, SolanaError> {
        self.signer
            .ready()
            .map_err(|reason| SolanaError::SignerUnavailable(self.rpc.network(), reason.to_string()))
    }

    fn license_program(&self) -> Result<&Pubkey, SolanaError> {
        self.license_program
            .ready()
            .map_err(|reason| SolanaError::NetworkNotConfigured(self.rpc.network(), reason.to_string()))
    }

    /// Compile, sign with the master keypair and submit.
    async fn submit(&self, signer: &SigningKey, instructions: &[Instruction]) -> Result<String, SolanaError> {
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let message = Message::compile(&pubkey_of(signer), instructions, blockhash)?;
        let (transaction, _) = message.sign(&[signer])?;
        self.rpc.send_transaction(&transaction).await
    }
}

/// Per-network Solana operations.
#[derive(Debug, Clone)]
pub struct SolanaService {
    clusters: NetworkPair<NetworkSlot<SolanaCluster>>,
    license_duration_days: u32,
}

impl SolanaService {
    pub fn new(clusters: NetworkPair<NetworkSlot<SolanaCluster>>, license_duration_days: u32) -> Self {
        Self {
            clusters,
            license_duration_days,
        }
    }

    pub fn from_config(config: &SolanaConfig) -> Self {
        let build = |network: Network| match config.clusters.get(network) {
            None => NetworkSlot::unconfigured(format!("no RPC endpoint configured for Solana {network}")),
            Some(cluster) => match SolanaCluster::from_config(network, cluster, &config.commitment) {
                Ok(cluster) => NetworkSlot::Ready(cluster),
                Err(e) => {
                    tracing::warn!(%network, error = %e, "Solana client could not be built");
                    NetworkSlot::unconfigured(e.to_string())
                }
            },
        };

        Self::new(
            NetworkPair::new(build(Network::Testnet), build(Network::Mainnet)),
            config.license_duration_days,
        )
    }

    pub fn is_configured(&self, network: Network) -> bool {
        self.clusters.get(network).is_ready()
    }

    fn cluster(&self, network: Network) -> Result<&SolanaCluster, SolanaError> {
        self.clusters
            .get(network)
            .ready()
            .map_err(|reason| SolanaError::NetworkNotConfigured(network, reason.to_string()))
    }

    pub async fn get_balance(&self, network: Network, address: &str) -> Result<SolanaBalanceResponse, SolanaError> {
        let cluster = self.cluster(network)?;
        let key = Pubkey::from_str(address)?;

        let lamports = cluster.rpc.get_balance(&key).await?;

        Ok(SolanaBalanceResponse {
            address: address.to_string(),
            balance: lamports as f64 / LAMPORTS_PER_SOL as f64,
            lamports,
        })
    }

    /// Send `amount` SOL from the master wallet to `to`.
    pub async fn transfer(&self, network: Network, to: &str, amount: f64) -> Result<SolanaTransferResponse, SolanaError> {
        let cluster = self.cluster(network)?;
        let signer = cluster.signer()?;
        let recipient = Pubkey::from_str(to)?;
        let lamports = sol_to_lamports(amount)?;
        let from = pubkey_of(signer);

        let signature = cluster
            .submit(signer, &[system_transfer(&from, &recipient, lamports)])
            .await?;
        let slot = cluster.rpc.get_slot().await?;

        tracing::info!(%network, %signature, %from, to, lamports, slot, "Solana transfer submitted");

        Ok(SolanaTransferResponse {
            signature,
            from: from.to_string(),
            to: to.to_string(),
            amount,
            slot,
        })
    }

    /// Issue a license for `name` to `recipient`, valid for the configured
    /// number of days.
    pub async fn create_license(
        &self,
        network: Network,
        recipient: &str,
        name: &str,
        uri: &str,
    ) -> Result<CreateLicenseResponse, SolanaError> {
        let cluster = self.cluster(network)?;
        let signer = cluster.signer()?;
        let program = cluster.license_program()?;
        let owner = Pubkey::from_str(recipient)?;

        let software_id = license::software_id(name);
        let (license_address, _) = license::license_address(&owner, software_id, program)?;
        let duration_seconds = i64::from(self.license_duration_days) * SECONDS_PER_DAY;

        let instruction = license::issue_license(
            program,
            &license_address,
            &owner,
            &pubkey_of(signer),
            software_id,
            duration_seconds,
        )?;
        let signature = cluster.submit(signer, &[instruction]).await?;

        tracing::info!(
            %network,
            %signature,
            license = %license_address,
            recipient,
            name,
            uri,
            software_id,
            "License issued"
        );

        Ok(CreateLicenseResponse {
            mint_address: license_address.to_string(),
            signature,
        })
    }

    /// Extend an existing license by `duration_days`.
    pub async fn renew_license(
        &self,
        network: Network,
        owner: &str,
        name: &str,
        duration_days: u32,
    ) -> Result<RenewLicenseResponse, SolanaError> {
        let cluster = self.cluster(network)?;
        let signer = cluster.signer()?;
        let program = cluster.license_program()?;
        let owner_key = Pubkey::from_str(owner)?;

        let (license_address, _) = license::license_address(&owner_key, license::software_id(name), program)?;
        if cluster.rpc.get_account_data(&license_address).await?.is_none() {
            return Err(SolanaError::LicenseNotFound(license_address.to_string()));
        }

        let instruction = license::renew_license(
            program,
            &license_address,
            &pubkey_of(signer),
            i64::from(duration_days) * SECONDS_PER_DAY,
        )?;
        let signature = cluster.submit(signer, &[instruction]).await?;

        tracing::info!(%network, %signature, license = %license_address, duration_days, "License renewed");

        Ok(RenewLicenseResponse {
            license_address: license_address.to_string(),
            signature,
        })
    }

    /// Read the license account for `owner` and `name`.
    pub async fn license_state(&self, network: Network, owner: &str, name: &str) -> Result<LicenseStateResponse, SolanaError> {
        let cluster = self.cluster(network)?;
        let program = cluster.license_program()?;
        let owner_key = Pubkey::from_str(owner)?;

        let (license_address, _) = license::license_address(&owner_key, license::software_id(name), program)?;
        let data = cluster
            .rpc
            .get_account_data(&license_address)
            .await?
            .ok_or_else(|| SolanaError::LicenseNotFound(license_address.to_string()))?;
        let account = LicenseAccount::decode(&data)?;

        let now = chrono::Utc::now().timestamp();

        Ok(LicenseStateResponse {
            license_address: license_address.to_string(),
            owner: account.owner.to_string(),
            authority: account.authority.to_string(),
            software_id: account.software_id.to_string(),
            purchase_timestamp: account.purchase_timestamp,
            expiration_timestamp: account.expiration_timestamp,
            is_active: account.is_active,
            is_valid: account.is_active && account.expiration_timestamp > now,
        })
    }
}

/// Convert SOL to lamports, rounding to the nearest lamport.
pub fn sol_to_lamports(amount: f64) -> Result<u64, SolanaError> {
    let lamports = (amount * LAMPORTS_PER_SOL as f64).round();
    if !lamports.is_finite() || lamports < 1.0 || lamports > u64::MAX as f64 {
        return Err(SolanaError::InvalidAmount(format!(
            "{amount} SOL is not a positive number of lamports"
        )));
    }
    Ok(lamports as u64)
}

#[cfg(test)]
mod tests {
    use super::super::client::test_support::*;
    use super::*;
    use mockito::{Matcher, Mock, ServerGuard};
    use serde_json::{json, Value};

    const PROGRAM_ID: &str = "BTQyLHZd6PPTu5jY2wWUxxYAmWKRVyadSMZwhLmX4gvn";

    fn master() -> SigningKey {
        SigningKey::from_bytes(&[21; 32])
    }

    fn recipient() -> String {
        pubkey_of(&SigningKey::from_bytes(&[22; 32])).to_string()
    }

    fn service(url: &str, signer: Option<SigningKey>) -> SolanaService {
        let cluster = SolanaCluster::new(
            client_for(url),
            signer.map_or_else(|| NetworkSlot::unconfigured("no master wallet path configured"), NetworkSlot::Ready),
            NetworkSlot::Ready(PROGRAM_ID.parse().unwrap()),
        );
        SolanaService::new(
            NetworkPair::new(
                NetworkSlot::Ready(cluster),
                NetworkSlot::unconfigured("no RPC endpoint configured for Solana mainnet"),
            ),
            365,
        )
    }

    async fn mock_method(server: &mut ServerGuard, method: &str, result: Value, hits: usize) -> Mock {
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": method })))
            .with_body(ok_body(result))
            .expect(hits)
            .create_async()
            .await
    }

    fn blockhash() -> Value {
        json!({
            "context": { "slot": 1 },
            "value": { "blockhash": Pubkey::new([7; 32]).to_string(), "lastValidBlockHeight": 100 }
        })
    }

    #[test]
    fn lamport_conversion() {
        assert_eq!(sol_to_lamports(1.5).unwrap(), 1_500_000_000);
        assert_eq!(sol_to_lamports(0.000000001).unwrap(), 1);
        assert!(sol_to_lamports(0.0000000001).is_err());
        assert!(sol_to_lamports(-1.0).is_err());
        assert!(sol_to_lamports(f64::NAN).is_err());
    }

    #[tokio::test]
    async fn unconfigured_network_is_typed_error() {
        let service = service("http://127.0.0.1:9", None);
        let err = service.get_balance(Network::Mainnet, &recipient()).await.unwrap_err();
        assert!(matches!(err, SolanaError::NetworkNotConfigured(Network::Mainnet, _)));
    }

    #[tokio::test]
    async fn balance_reports_sol_and_lamports() {
        let mut server = mockito::Server::new_async().await;
        let _balance = mock_method(&mut server, "getBalance", json!({ "context": { "slot": 1 }, "value": 1_250_000_000u64 }), 1).await;

        let balance = service(&server.url(), None)
            .get_balance(Network::Testnet, &recipient())
            .await
            .unwrap();

        assert_eq!(balance.lamports, 1_250_000_000);
        assert_eq!(balance.balance, 1.25);
    }

    #[tokio::test]
    async fn invalid_address_fails_before_rpc() {
        let mut server = mockito::Server::new_async().await;
        let any = server.mock("POST", Matcher::Any).expect(0).create_async().await;

        let err = service(&server.url(), None)
            .get_balance(Network::Testnet, "not-base58-0OIl")
            .await
            .unwrap_err();

        assert!(matches!(err, SolanaError::InvalidAddress(_)));
        any.assert_async().await;
    }

    #[tokio::test]
    async fn signing_without_master_wallet_makes_no_calls() {
        let mut server = mockito::Server::new_async().await;
        let any = server.mock("POST", Matcher::Any).expect(0).create_async().await;

        let service = service(&server.url(), None);
        let err = service.transfer(Network::Testnet, &recipient(), 1.0).await.unwrap_err();
        assert!(matches!(err, SolanaError::SignerUnavailable(Network::Testnet, _)));

        let err = service
            .create_license(Network::Testnet, &recipient(), "Ganji Pro", "https://ganji.example/pro.json")
            .await
            .unwrap_err();
        assert!(matches!(err, SolanaError::SignerUnavailable(..)));
        any.assert_async().await;
    }

    #[tokio::test]
    async fn transfer_submits_and_reports_slot() {
        let mut server = mockito::Server::new_async().await;
        let _hash = mock_method(&mut server, "getLatestBlockhash", blockhash(), 1).await;
        let send = mock_method(&mut server, "sendTransaction", json!("3xSig"), 1).await;
        let _slot = mock_method(&mut server, "getSlot", json!(4242), 1).await;

        let result = service(&server.url(), Some(master()))
            .transfer(Network::Testnet, &recipient(), 0.5)
            .await
            .unwrap();

        assert_eq!(result.signature, "3xSig");
        assert_eq!(result.from, pubkey_of(&master()).to_string());
        assert_eq!(result.to, recipient());
        assert_eq!(result.amount, 0.5);
        assert_eq!(result.slot, 4242);
        send.assert_async().await;
    }

    #[tokio::test]
    async fn create_license_returns_derived_address() {
        let mut server = mockito::Server::new_async().await;
        let _hash = mock_method(&mut server, "getLatestBlockhash", blockhash(), 1).await;
        let send = mock_method(&mut server, "sendTransaction", json!("4LicSig"), 1).await;

        let result = service(&server.url(), Some(master()))
            .create_license(Network::Testnet, &recipient(), "Ganji Pro", "https://ganji.example/pro.json")
            .await
            .unwrap();

        let owner: Pubkey = recipient().parse().unwrap();
        let (expected, _) =
            license::license_address(&owner, license::software_id("Ganji Pro"), &PROGRAM_ID.parse().unwrap()).unwrap();
        assert_eq!(result.mint_address, expected.to_string());
        assert_eq!(result.signature, "4LicSig");
        send.assert_async().await;
    }

    #[tokio::test]
    async fn renew_missing_license_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _info = mock_method(&mut server, "getAccountInfo", json!({ "context": { "slot": 1 }, "value": null }), 1).await;
        let send = mock_method(&mut server, "sendTransaction", json!("never"), 0).await;

        let err = service(&server.url(), Some(master()))
            .renew_license(Network::Testnet, &recipient(), "Ganji Pro", 30)
            .await
            .unwrap_err();

        assert!(matches!(err, SolanaError::LicenseNotFound(_)));
        send.assert_async().await;
    }

    #[tokio::test]
    async fn license_state_decodes_account() {
        use base64ct::{Base64, Encoding};

        let owner: Pubkey = recipient().parse().unwrap();
        let account = LicenseAccount {
            owner,
            authority: pubkey_of(&master()),
            software_id: license::software_id("Ganji Pro"),
            purchase_timestamp: 1_700_000_000,
            expiration_timestamp: i64::MAX,
            is_active: true,
            bump: 255,
        };

        let mut server = mockito::Server::new_async().await;
        let _info = mock_method(
            &mut server,
            "getAccountInfo",
            json!({
                "context": { "slot": 1 },
                "value": { "data": [Base64::encode_string(&account.encode()), "base64"], "lamports": 1_000_000 }
            }),
            1,
        )
        .await;

        let state = service(&server.url(), None)
            .license_state(Network::Testnet, &recipient(), "Ganji Pro")
            .await
            .unwrap();

        assert_eq!(state.owner, recipient());
        assert_eq!(state.authority, pubkey_of(&master()).to_string());
        assert_eq!(state.software_id, license::software_id("Ganji Pro").to_string());
        assert!(state.is_active);
        assert!(state.is_valid);
    }
}
