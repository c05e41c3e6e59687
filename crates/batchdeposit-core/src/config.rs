//! Deployment and depositor configuration.
//!
//! Construction parameters of a depositor are fixed once built. Network
//! endpoints and signing credentials are carried for the external deploy
//! tooling and never used by the core itself.

use alloy_primitives::{address, Address};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::validator::ValidationPolicy;

/// Canonical deposit contract on Ethereum mainnet.
pub const MAINNET_DEPOSIT_CONTRACT: Address = address!("00000000219ab540356cBB839Cbe05303d7705Fa");
/// Deposit contract on the Holesky testnet.
pub const HOLESKY_DEPOSIT_CONTRACT: Address = address!("4242424242424242424242424242424242424242");
/// Deposit contract on the Hoodi testnet.
pub const HOODI_DEPOSIT_CONTRACT: Address = address!("00000000219ab540356cBB839Cbe05303d7705Fa");

pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

pub const ENV_RPC_URL: &str = "BATCHDEPOSIT_RPC_ENDPOINT_URL";
pub const ENV_PRIVATE_KEY: &str = "BATCHDEPOSIT_PRIVATE_KEY";
pub const ENV_NETWORK: &str = "BATCHDEPOSIT_NETWORK";

// ─── Network ──────────────────────────────────────────────────────────────────

/// Networks the depositor is deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Local development chain.
    #[default]
    Hardhat,
    Mainnet,
    Holesky,
    Hoodi,
}

impl Network {
    pub const ALL: [Network; 4] = [Self::Hardhat, Self::Mainnet, Self::Holesky, Self::Hoodi];

    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Hardhat => 31_337,
            Self::Mainnet => 1,
            Self::Holesky => 17_000,
            Self::Hoodi => 560_048,
        }
    }

    /// The network's deposit contract, if it has a canonical one.
    pub fn deposit_contract(&self) -> Option<Address> {
        match self {
            Self::Hardhat => None,
            Self::Mainnet => Some(MAINNET_DEPOSIT_CONTRACT),
            Self::Holesky => Some(HOLESKY_DEPOSIT_CONTRACT),
            Self::Hoodi => Some(HOODI_DEPOSIT_CONTRACT),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hardhat => "hardhat",
            Self::Mainnet => "mainnet",
            Self::Holesky => "holesky",
            Self::Hoodi => "hoodi",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownNetwork { name: s.to_string() })
    }
}

// ─── DepositorConfig ──────────────────────────────────────────────────────────

/// Construction parameters of a batch depositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositorConfig {
    /// Bind to the canonical mainnet ledger regardless of `contract_address`.
    #[serde(default)]
    mainnet_deploy: bool,
    /// Ledger address used when `mainnet_deploy` is off.
    #[serde(default = "default_contract_address")]
    contract_address: Address,
    #[serde(default)]
    policy: ValidationPolicy,
}

fn default_contract_address() -> Address {
    MAINNET_DEPOSIT_CONTRACT
}

impl DepositorConfig {
    pub fn new(mainnet_deploy: bool, contract_address: Address) -> Self {
        Self {
            mainnet_deploy,
            contract_address,
            policy: ValidationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn mainnet_deploy(&self) -> bool {
        self.mainnet_deploy
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// The ledger forwards are sent to.
    pub fn ledger_address(&self) -> Address {
        if self.mainnet_deploy {
            MAINNET_DEPOSIT_CONTRACT
        } else {
            self.contract_address
        }
    }
}

impl Default for DepositorConfig {
    fn default() -> Self {
        Self::new(false, default_contract_address())
    }
}

// ─── DeploymentConfig ─────────────────────────────────────────────────────────

/// A signing key handed to deploy tooling. Redacted in `Debug`, never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(String);

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Everything the external deploy step needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub network: Network,
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(skip)]
    pub private_key: Option<SigningKey>,
    #[serde(default)]
    pub depositor: DepositorConfig,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc_url: default_rpc_url(),
            private_key: None,
            depositor: DepositorConfig::default(),
        }
    }
}

impl DeploymentConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply `BATCHDEPOSIT_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = lookup(ENV_NETWORK) {
            self.network = network.parse()?;
        }
        if let Some(url) = lookup(ENV_RPC_URL) {
            if url.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: ENV_RPC_URL.into(),
                    reason: "empty URL".into(),
                });
            }
            self.rpc_url = url;
        }
        if let Some(key) = lookup(ENV_PRIVATE_KEY).filter(|k| !k.is_empty()) {
            self.private_key = Some(SigningKey(key));
        }
        Ok(())
    }

    /// Chain id of the configured network.
    pub fn chain_id(&self) -> u64 {
        self.network.chain_id()
    }

    /// `true` when deploy tooling has an account to sign with.
    pub fn has_signer(&self) -> bool {
        self.private_key.is_some()
    }
}

/// Read and parse any YAML config file.
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}
