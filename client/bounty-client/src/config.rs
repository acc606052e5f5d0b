//! Client configuration.
//!
//! # Sources
//!
//! - Environment variables prefixed with `BOUNTY_` ([`ClientConfig::from_env`])
//! - JSON documents ([`ClientConfig::from_json`])
//! - Programmatic defaults
//!
//! Every loader runs [`ClientConfig::validate`] before returning.

use crate::chain::ContractId;
use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
pub const MAINNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Inclusive bounds for the background refresh interval.
pub const POLL_INTERVAL_RANGE_SECS: std::ops::RangeInclusive<u64> = 10..=15;

/// `i128` holds at most 38 full decimal digits.
pub const MAX_TOKEN_DECIMALS: u32 = 38;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}

/// The networks the client supports, identified by passphrase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Testnet, Network::Mainnet];

    pub fn passphrase(self) -> &'static str {
        match self {
            Network::Testnet => TESTNET_PASSPHRASE,
            Network::Mainnet => MAINNET_PASSPHRASE,
        }
    }

    pub fn from_passphrase(passphrase: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|network| network.passphrase() == passphrase)
    }

    pub fn explorer_base(self) -> &'static str {
        match self {
            Network::Testnet => "https://stellar.expert/explorer/testnet",
            Network::Mainnet => "https://stellar.expert/explorer/public",
        }
    }

    /// Variable that supplies this network's reward token address.
    pub fn token_env_var(self) -> &'static str {
        match self {
            Network::Testnet => "BOUNTY_TESTNET_REWARD_TOKEN",
            Network::Mainnet => "BOUNTY_MAINNET_REWARD_TOKEN",
        }
    }

    fn registry_env_var(self) -> &'static str {
        match self {
            Network::Testnet => "BOUNTY_TESTNET_REGISTRY",
            Network::Mainnet => "BOUNTY_MAINNET_REGISTRY",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Testnet => "Stellar Testnet",
            Network::Mainnet => "Stellar Mainnet",
        })
    }
}

/// Contract addresses for one network. Unset or all-zero ids count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deployment {
    pub registry: Option<ContractId>,
    pub reward_token: Option<ContractId>,
}

impl Deployment {
    pub fn registry(&self) -> Option<&ContractId> {
        self.registry.as_ref().filter(|id| !id.is_unset())
    }

    pub fn reward_token(&self) -> Option<&ContractId> {
        self.reward_token.as_ref().filter(|id| !id.is_unset())
    }
}

/// Display metadata of the reward token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u32,
}

impl Default for TokenInfo {
    fn default() -> Self {
        Self {
            symbol: "XLM".into(),
            decimals: 7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_secs: 12 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub testnet: Deployment,
    pub mainnet: Deployment,
    pub token: TokenInfo,
    pub poll: PollConfig,
    /// How long the create flow stays on its success screen.
    pub success_display_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            testnet: Deployment::default(),
            mainnet: Deployment::default(),
            token: TokenInfo::default(),
            poll: PollConfig::default(),
            success_display_ms: 2_000,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// - `BOUNTY_TESTNET_REGISTRY`, `BOUNTY_TESTNET_REWARD_TOKEN`
    /// - `BOUNTY_MAINNET_REGISTRY`, `BOUNTY_MAINNET_REWARD_TOKEN`
    /// - `BOUNTY_TOKEN_SYMBOL`, `BOUNTY_TOKEN_DECIMALS`
    /// - `BOUNTY_POLL_INTERVAL_SECS`
    /// - `BOUNTY_SUCCESS_DISPLAY_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        for network in Network::ALL {
            let deployment = config.deployment_mut(network);
            if let Some(id) = lookup(network.registry_env_var()) {
                deployment.registry = Some(ContractId::new(id.trim()));
            }
            if let Some(id) = lookup(network.token_env_var()) {
                deployment.reward_token = Some(ContractId::new(id.trim()));
            }
        }

        if let Some(symbol) = lookup("BOUNTY_TOKEN_SYMBOL") {
            config.token.symbol = symbol.trim().to_owned();
        }
        if let Some(decimals) = lookup("BOUNTY_TOKEN_DECIMALS") {
            config.token.decimals = parse_var("BOUNTY_TOKEN_DECIMALS", &decimals)?;
        }
        if let Some(secs) = lookup("BOUNTY_POLL_INTERVAL_SECS") {
            config.poll.interval_secs = parse_var("BOUNTY_POLL_INTERVAL_SECS", &secs)?;
        }
        if let Some(ms) = lookup("BOUNTY_SUCCESS_DISPLAY_MS") {
            config.success_display_ms = parse_var("BOUNTY_SUCCESS_DISPLAY_MS", &ms)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !POLL_INTERVAL_RANGE_SECS.contains(&self.poll.interval_secs) {
            return Err(ConfigError::Validation(format!(
                "poll.interval_secs must be between {} and {}",
                POLL_INTERVAL_RANGE_SECS.start(),
                POLL_INTERVAL_RANGE_SECS.end()
            )));
        }

        if self.token.symbol.is_empty() {
            return Err(ConfigError::Validation(
                "token.symbol must not be empty".into(),
            ));
        }

        if self.token.decimals > MAX_TOKEN_DECIMALS {
            return Err(ConfigError::Validation(format!(
                "token.decimals must be at most {MAX_TOKEN_DECIMALS}"
            )));
        }

        if self.success_display_ms == 0 {
            return Err(ConfigError::Validation(
                "success_display_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn deployment(&self, network: Network) -> &Deployment {
        match network {
            Network::Testnet => &self.testnet,
            Network::Mainnet => &self.mainnet,
        }
    }

    fn deployment_mut(&mut self, network: Network) -> &mut Deployment {
        match network {
            Network::Testnet => &mut self.testnet,
            Network::Mainnet => &mut self.mainnet,
        }
    }

    /// Map the wallet's network passphrase to a supported network.
    pub fn resolve(&self, passphrase: &str) -> Result<(Network, &Deployment), ClientError> {
        let network =
            Network::from_passphrase(passphrase).ok_or_else(|| ClientError::UnsupportedNetwork {
                passphrase: passphrase.to_owned(),
            })?;
        Ok((network, self.deployment(network)))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    pub fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var: var.to_owned(),
        reason: e.to_string(),
    })
}
