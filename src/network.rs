// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network selection shared by the Litecoin and Solana layers.
//!
//! Every chain-facing operation is parameterised by a [`Network`]. Handles
//! that depend on per-network configuration are held in a [`NetworkPair`] of
//! [`NetworkSlot`]s, so an unconfigured network surfaces as a typed error at
//! the point of use instead of a missing value discovered deep in a call.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// Which deployment of a chain an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    /// Map the wire-level `useTestnet` flag to a network.
    pub fn from_testnet_flag(use_testnet: bool) -> Self {
        if use_testnet {
            Network::Testnet
        } else {
            Network::Mainnet
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per network, selected once per call.
#[derive(Debug, Clone)]
pub struct NetworkPair<T> {
    pub testnet: T,
    pub mainnet: T,
}

impl<T> NetworkPair<T> {
    pub fn new(testnet: T, mainnet: T) -> Self {
        Self { testnet, mainnet }
    }

    pub fn get(&self, network: Network) -> &T {
        match network {
            Network::Testnet => &self.testnet,
            Network::Mainnet => &self.mainnet,
        }
    }

    /// Build a new pair by applying `f` to both sides.
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(Network, T) -> Result<U, E>,
    ) -> Result<NetworkPair<U>, E> {
        Ok(NetworkPair {
            testnet: f(Network::Testnet, self.testnet)?,
            mainnet: f(Network::Mainnet, self.mainnet)?,
        })
    }
}

/// A per-network handle that is either ready for use or was never configured.
#[derive(Debug, Clone)]
pub enum NetworkSlot<T> {
    /// The handle could not be built; `reason` explains why.
    Unconfigured { reason: String },
    Ready(T),
}

impl<T> NetworkSlot<T> {
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        NetworkSlot::Unconfigured {
            reason: reason.into(),
        }
    }

    /// Borrow the ready handle, or return the reason it is unavailable.
    pub fn ready(&self) -> Result<&T, &str> {
        match self {
            NetworkSlot::Ready(value) => Ok(value),
            NetworkSlot::Unconfigured { reason } => Err(reason.as_str()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, NetworkSlot::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testnet_flag_selects_network() {
        assert_eq!(Network::from_testnet_flag(true), Network::Testnet);
        assert_eq!(Network::from_testnet_flag(false), Network::Mainnet);
        assert_eq!(Network::Testnet.to_string(), "testnet");
    }

    #[test]
    fn pair_selects_side() {
        let pair = NetworkPair::new("t", "m");
        assert_eq!(*pair.get(Network::Testnet), "t");
        assert_eq!(*pair.get(Network::Mainnet), "m");
    }

    #[test]
    fn try_map_short_circuits_on_error() {
        let pair = NetworkPair::new(1, 2);
        let doubled: Result<NetworkPair<i32>, String> = pair.clone().try_map(|_, v| Ok(v * 2));
        assert_eq!(doubled.unwrap().mainnet, 4);

        let failed: Result<NetworkPair<i32>, String> =
            pair.try_map(|net, v| if net == Network::Mainnet { Err("boom".into()) } else { Ok(v) });
        assert_eq!(failed.unwrap_err(), "boom");
    }

    #[test]
    fn slot_reports_reason() {
        let slot: NetworkSlot<u8> = NetworkSlot::unconfigured("LITECOIN_MAINNET_RPC_URL not set");
        assert!(!slot.is_ready());
        assert_eq!(slot.ready().unwrap_err(), "LITECOIN_MAINNET_RPC_URL not set");

        let ready = NetworkSlot::Ready(7u8);
        assert_eq!(*ready.ready().unwrap(), 7);
    }
}
