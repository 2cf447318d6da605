// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Litecoin service facade used by the HTTP layer.

use bitcoin::Amount;
use serde_json::json;

use crate::config::LitecoinConfig;
use crate::network::{Network, NetworkPair, NetworkSlot};

use super::asset::AssetRegistry;
use super::error::LitecoinError;
use super::rpc::{LitecoinRpc, RpcScope};
use super::types::{
    CreatedWallet, LitecoinBalanceResponse, LitecoinTransferResponse, NetworkInfoResponse,
    NodeNetworkInfo, RegisterAssetResponse, VerifyAssetResponse, WalletTransaction,
};

/// Label attached to addresses minted by [`LitecoinService::create_wallet`].
const ADDRESS_LABEL: &str = "ganji-wallet";

/// Reported when the node omits the fee of a wallet transaction.
const DEFAULT_TRANSFER_FEE_LTC: f64 = 0.0001;

/// Per-network Litecoin operations.
#[derive(Debug, Clone)]
pub struct LitecoinService {
    nodes: NetworkPair<NetworkSlot<LitecoinRpc>>,
}

impl LitecoinService {
    pub fn new(nodes: NetworkPair<NetworkSlot<LitecoinRpc>>) -> Self {
        Self { nodes }
    }

    /// Build one client per configured network. Networks without RPC
    /// settings stay unconfigured and fail at the point of use.
    pub fn from_config(config: &LitecoinConfig) -> Self {
        let build = |network: Network| match config.nodes.get(network) {
            None => NetworkSlot::unconfigured(format!(
                "no RPC endpoint configured for Litecoin {network}"
            )),
            Some(node) => {
                match LitecoinRpc::new(network, node, &config.wallet_name, config.rpc_timeout) {
                    Ok(rpc) => {
                        tracing::info!(%network, wallet = %config.wallet_name, "Litecoin RPC client ready");
                        NetworkSlot::Ready(rpc)
                    }
                    Err(e) => {
                        tracing::warn!(%network, error = %e, "Litecoin RPC client could not be built");
                        NetworkSlot::unconfigured(e.to_string())
                    }
                }
            }
        };

        Self::new(NetworkPair::new(build(Network::Testnet), build(Network::Mainnet)))
    }

    pub fn is_configured(&self, network: Network) -> bool {
        self.nodes.get(network).is_ready()
    }

    fn rpc(&self, network: Network) -> Result<&LitecoinRpc, LitecoinError> {
        self.nodes
            .get(network)
            .ready()
            .map_err(|reason| LitecoinError::NetworkNotConfigured(network, reason.to_string()))
    }

    /// Amount received by `address`, split into confirmed and pending.
    pub async fn get_balance(
        &self,
        network: Network,
        address: &str,
    ) -> Result<LitecoinBalanceResponse, LitecoinError> {
        let rpc = self.rpc(network)?;

        let confirmed = received_by(rpc, address, 1).await?;
        let including_pending = received_by(rpc, address, 0).await?;
        let unconfirmed = including_pending
            .checked_sub(confirmed)
            .unwrap_or(Amount::ZERO);

        Ok(LitecoinBalanceResponse {
            address: address.to_string(),
            balance: confirmed.to_btc(),
            unconfirmed_balance: unconfirmed.to_btc(),
        })
    }

    /// Mint a fresh address in the managed wallet and export its key.
    pub async fn create_wallet(&self, network: Network) -> Result<CreatedWallet, LitecoinError> {
        let rpc = self.rpc(network)?;

        let address: String = rpc
            .wallet_call("getnewaddress", json!([ADDRESS_LABEL]))
            .await?;
        let private_key: String = rpc.wallet_call("dumpprivkey", json!([address])).await?;

        tracing::info!(%network, %address, "Litecoin address created");

        Ok(CreatedWallet {
            address,
            private_key,
        })
    }

    /// Pay `amount` LTC from the managed wallet to `destination`.
    pub async fn send(
        &self,
        network: Network,
        destination: &str,
        amount: f64,
    ) -> Result<LitecoinTransferResponse, LitecoinError> {
        let rpc = self.rpc(network)?;

        let tx_id: String = rpc
            .wallet_call("sendtoaddress", json!([destination, amount]))
            .await?;
        let details: WalletTransaction = rpc.wallet_call("gettransaction", json!([tx_id])).await?;

        let fee = details
            .fee
            .map(f64::abs)
            .unwrap_or(DEFAULT_TRANSFER_FEE_LTC);

        tracing::info!(%network, %tx_id, destination, amount, fee, "Litecoin transfer sent");

        Ok(LitecoinTransferResponse { tx_id, amount, fee })
    }

    /// See [`AssetRegistry::verify_transaction`]. An unconfigured network
    /// also resolves to `false`.
    pub async fn verify_transaction(&self, network: Network, tx_id: &str) -> bool {
        match self.rpc(network) {
            Ok(rpc) => AssetRegistry::new(rpc).verify_transaction(tx_id).await,
            Err(e) => {
                tracing::debug!(%network, tx_id, error = %e, "Transaction lookup skipped");
                false
            }
        }
    }

    pub async fn register_asset(
        &self,
        network: Network,
        data: &str,
    ) -> Result<RegisterAssetResponse, LitecoinError> {
        let rpc = self.rpc(network)?;
        AssetRegistry::new(rpc).register(data).await.inspect_err(|e| {
            tracing::error!(%network, error = %e, data_length = data.len(), "Failed to register asset");
        })
    }

    pub async fn verify_asset(
        &self,
        network: Network,
        tx_id: &str,
    ) -> Result<VerifyAssetResponse, LitecoinError> {
        let rpc = self.rpc(network)?;
        AssetRegistry::new(rpc).verify(tx_id).await
    }

    pub async fn network_info(&self, network: Network) -> Result<NetworkInfoResponse, LitecoinError> {
        let rpc = self.rpc(network)?;
        let info: NodeNetworkInfo = rpc
            .call("getnetworkinfo", json!([]), RpcScope::Node)
            .await?;

        Ok(NetworkInfoResponse {
            version: info.version,
            subversion: info.subversion,
            connections: info.connections,
            network,
        })
    }
}

async fn received_by(rpc: &LitecoinRpc, address: &str, min_conf: u32) -> Result<Amount, LitecoinError> {
    let ltc: f64 = rpc
        .wallet_call("getreceivedbyaddress", json!([address, min_conf]))
        .await?;
    Amount::from_btc(ltc).map_err(|e| {
        LitecoinError::InvalidResponse(format!("getreceivedbyaddress returned {ltc}: {e}"))
    })
}
