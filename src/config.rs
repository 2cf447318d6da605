// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read once from the environment at startup into a typed
//! [`AppConfig`]. Per-network chain settings are optional: a network whose
//! RPC URL is absent is reported as unconfigured when first used rather than
//! failing the whole process.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `NODE_ENV` | `development`, `production` or `test` | `development` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `AUTH_API_KEY` | Value expected in the `x-api-key` header | Required |
//! | `RATE_LIMIT_MAX_REQUESTS` | Requests per client IP per window | `100` |
//! | `RATE_LIMIT_WINDOW_SECS` | Sliding window length | `900` |
//! | `LITECOIN_{TESTNET,MAINNET}_RPC_URL` | Litecoin node JSON-RPC endpoint | Optional |
//! | `LITECOIN_{TESTNET,MAINNET}_RPC_USER` | RPC username | Required with URL |
//! | `LITECOIN_{TESTNET,MAINNET}_RPC_PASS` | RPC password | Required with URL |
//! | `LITECOIN_WALLET_NAME` | Node-managed wallet name | `ganji` |
//! | `LITECOIN_RPC_TIMEOUT_SECS` | Outbound RPC timeout | `30` |
//! | `SOLANA_{TESTNET,MAINNET}_RPC_URL` | Solana JSON-RPC endpoint | Optional |
//! | `SOLANA_{TESTNET,MAINNET}_WALLET_PATH` | Master keypair JSON file | Optional |
//! | `SOLANA_{TESTNET,MAINNET}_LICENSE_PROGRAM_ID` | License program address | Optional |
//! | `SOLANA_COMMITMENT` | `processed`, `confirmed` or `finalized` | `confirmed` |
//! | `SOLANA_LICENSE_DURATION_DAYS` | Validity of newly issued licenses | `365` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; enables HTTPS when both set | Optional |

use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::network::{Network, NetworkPair};

pub const NODE_ENV_ENV: &str = "NODE_ENV";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const AUTH_API_KEY_ENV: &str = "AUTH_API_KEY";
pub const RATE_LIMIT_MAX_REQUESTS_ENV: &str = "RATE_LIMIT_MAX_REQUESTS";
pub const RATE_LIMIT_WINDOW_SECS_ENV: &str = "RATE_LIMIT_WINDOW_SECS";
pub const LITECOIN_WALLET_NAME_ENV: &str = "LITECOIN_WALLET_NAME";
pub const LITECOIN_RPC_TIMEOUT_SECS_ENV: &str = "LITECOIN_RPC_TIMEOUT_SECS";
pub const SOLANA_COMMITMENT_ENV: &str = "SOLANA_COMMITMENT";
pub const SOLANA_LICENSE_DURATION_DAYS_ENV: &str = "SOLANA_LICENSE_DURATION_DAYS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_WALLET_NAME: &str = "ganji";
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: usize = 100;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
const DEFAULT_LICENSE_DURATION_DAYS: u32 = 365;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Deployment environment. Controls how much error detail leaves the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    /// Whether raw failure messages may be returned to API callers.
    pub fn exposes_error_details(&self) -> bool {
        !matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!("unknown environment `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format `{other}`")),
        }
    }
}

/// Sliding-window limits applied per client IP.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

/// Credentials and endpoint for one Litecoin node.
#[derive(Debug, Clone)]
pub struct LitecoinNodeConfig {
    pub url: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LitecoinConfig {
    pub nodes: NetworkPair<Option<LitecoinNodeConfig>>,
    pub wallet_name: String,
    pub rpc_timeout: Duration,
}

/// Endpoint and signer settings for one Solana cluster.
#[derive(Debug, Clone)]
pub struct SolanaClusterConfig {
    pub rpc_url: String,
    pub wallet_path: Option<PathBuf>,
    pub license_program_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SolanaConfig {
    pub clusters: NetworkPair<Option<SolanaClusterConfig>>,
    pub commitment: String,
    pub license_duration_days: u32,
}

#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub api_key: String,
    pub rate_limit: RateLimitConfig,
    pub litecoin: LitecoinConfig,
    pub solana: SolanaConfig,
    pub tls: Option<TlsConfig>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let environment = env.parsed(NODE_ENV_ENV)?.unwrap_or(Environment::Development);
        let host = env.get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = env.parsed(PORT_ENV)?.unwrap_or(DEFAULT_PORT);
        let log_format = env.parsed(LOG_FORMAT_ENV)?.unwrap_or(LogFormat::Pretty);
        let api_key = env.required(AUTH_API_KEY_ENV)?;

        let rate_limit = RateLimitConfig {
            max_requests: env
                .parsed(RATE_LIMIT_MAX_REQUESTS_ENV)?
                .unwrap_or(DEFAULT_RATE_LIMIT_MAX_REQUESTS),
            window: Duration::from_secs(
                env.parsed(RATE_LIMIT_WINDOW_SECS_ENV)?
                    .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            ),
        };

        let litecoin = LitecoinConfig {
            nodes: NetworkPair::new(
                litecoin_node(&env, Network::Testnet)?,
                litecoin_node(&env, Network::Mainnet)?,
            ),
            wallet_name: env
                .get(LITECOIN_WALLET_NAME_ENV)
                .unwrap_or_else(|| DEFAULT_WALLET_NAME.to_string()),
            rpc_timeout: Duration::from_secs(
                env.parsed(LITECOIN_RPC_TIMEOUT_SECS_ENV)?
                    .unwrap_or(DEFAULT_RPC_TIMEOUT_SECS),
            ),
        };

        let commitment = env
            .get(SOLANA_COMMITMENT_ENV)
            .unwrap_or_else(|| "confirmed".to_string());
        if !matches!(commitment.as_str(), "processed" | "confirmed" | "finalized") {
            return Err(ConfigError::Invalid {
                name: SOLANA_COMMITMENT_ENV.to_string(),
                reason: format!("unknown commitment `{commitment}`"),
            });
        }

        let solana = SolanaConfig {
            clusters: NetworkPair::new(
                solana_cluster(&env, Network::Testnet),
                solana_cluster(&env, Network::Mainnet),
            ),
            commitment,
            license_duration_days: env
                .parsed(SOLANA_LICENSE_DURATION_DAYS_ENV)?
                .unwrap_or(DEFAULT_LICENSE_DURATION_DAYS),
        };

        let tls = match (env.get(TLS_CERT_PATH_ENV), env.get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV.to_string())),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV.to_string())),
        };

        Ok(Self {
            environment,
            host,
            port,
            log_format,
            api_key,
            rate_limit,
            litecoin,
            solana,
            tls,
        })
    }
}

fn network_prefix(network: Network) -> &'static str {
    match network {
        Network::Testnet => "TESTNET",
        Network::Mainnet => "MAINNET",
    }
}

fn litecoin_node<F>(env: &Env<'_, F>, network: Network) -> Result<Option<LitecoinNodeConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = format!("LITECOIN_{}", network_prefix(network));
    let Some(url) = env.get(&format!("{prefix}_RPC_URL")) else {
        return Ok(None);
    };
    url::Url::parse(&url).map_err(|e| ConfigError::Invalid {
        name: format!("{prefix}_RPC_URL"),
        reason: e.to_string(),
    })?;

    Ok(Some(LitecoinNodeConfig {
        url,
        username: env.required(&format!("{prefix}_RPC_USER"))?,
        password: env.required(&format!("{prefix}_RPC_PASS"))?,
    }))
}

fn solana_cluster<F>(env: &Env<'_, F>, network: Network) -> Option<SolanaClusterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = format!("SOLANA_{}", network_prefix(network));
    let rpc_url = env.get(&format!("{prefix}_RPC_URL"))?;

    Some(SolanaClusterConfig {
        rpc_url,
        wallet_path: env.get(&format!("{prefix}_WALLET_PATH")).map(PathBuf::from),
        license_program_id: env.get(&format!("{prefix}_LICENSE_PROGRAM_ID")),
    })
}

struct Env<'a, F>(&'a F);

impl<F> Env<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    fn parsed<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(name)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("AUTH_API_KEY", "secret")])).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window, Duration::from_secs(900));
        assert_eq!(config.litecoin.wallet_name, "ganji");
        assert!(config.litecoin.nodes.testnet.is_none());
        assert!(config.solana.clusters.mainnet.is_none());
        assert_eq!(config.solana.commitment, "confirmed");
        assert!(config.tls.is_none());
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref name) if name == "AUTH_API_KEY"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let err = AppConfig::from_lookup(lookup(&[("AUTH_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn litecoin_node_requires_credentials_with_url() {
        let err = AppConfig::from_lookup(lookup(&[
            ("AUTH_API_KEY", "secret"),
            ("LITECOIN_TESTNET_RPC_URL", "http://127.0.0.1:19332"),
            ("LITECOIN_TESTNET_RPC_USER", "user"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref name) if name == "LITECOIN_TESTNET_RPC_PASS"));
    }

    #[test]
    fn per_network_settings_are_independent() {
        let config = AppConfig::from_lookup(lookup(&[
            ("AUTH_API_KEY", "secret"),
            ("NODE_ENV", "production"),
            ("LITECOIN_TESTNET_RPC_URL", "http://127.0.0.1:19332"),
            ("LITECOIN_TESTNET_RPC_USER", "user"),
            ("LITECOIN_TESTNET_RPC_PASS", "pass"),
            ("SOLANA_MAINNET_RPC_URL", "https://api.mainnet-beta.solana.com"),
            ("SOLANA_MAINNET_WALLET_PATH", "/secrets/master.json"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert!(!config.environment.exposes_error_details());
        let node = config.litecoin.nodes.get(Network::Testnet).as_ref().unwrap();
        assert_eq!(node.username, "user");
        assert!(config.litecoin.nodes.get(Network::Mainnet).is_none());

        let cluster = config.solana.clusters.get(Network::Mainnet).as_ref().unwrap();
        assert_eq!(cluster.wallet_path, Some(PathBuf::from("/secrets/master.json")));
        assert!(cluster.license_program_id.is_none());
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = AppConfig::from_lookup(lookup(&[("AUTH_API_KEY", "k"), ("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref name, .. } if name == "PORT"));

        let err = AppConfig::from_lookup(lookup(&[
            ("AUTH_API_KEY", "k"),
            ("SOLANA_COMMITMENT", "eventually"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn tls_requires_both_paths() {
        let err = AppConfig::from_lookup(lookup(&[
            ("AUTH_API_KEY", "k"),
            ("TLS_CERT_PATH", "/tls/cert.pem"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref name) if name == "TLS_KEY_PATH"));
    }
}
