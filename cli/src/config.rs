//! CLI configuration: the deployment section plus logging.
//!
//! ```yaml
//! network: holesky
//! rpc_url: http://localhost:8545
//! depositor:
//!   mainnet_deploy: false
//!   contract_address: "0x4242424242424242424242424242424242424242"
//!   policy: compatible
//! log:
//!   level: info
//!   json: false
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use batchdeposit_core::config::load_yaml;
use batchdeposit_core::DeploymentConfig;
use batchdeposit_observability::LogConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(flatten)]
    pub deployment: DeploymentConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    /// Load `path` if given, then apply `BATCHDEPOSIT_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => load_yaml::<Self>(p)
                .with_context(|| format!("loading config from {}", p.display()))?,
            None => Self::default(),
        };
        config
            .deployment
            .apply_env()
            .context("applying environment overrides")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchdeposit_core::{Network, ValidationPolicy};

    #[test]
    fn parses_deployment_and_log_sections() {
        let yaml = r#"
network: holesky
depositor:
  contract_address: "0x4242424242424242424242424242424242424242"
  policy: strict
log:
  level: debug
  json: true
"#;
        let cfg: CliConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.deployment.network, Network::Holesky);
        assert_eq!(cfg.deployment.depositor.policy(), ValidationPolicy::Strict);
        assert_eq!(cfg.log.level, "debug");
        assert!(cfg.log.json);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: CliConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.deployment.network, Network::Hardhat);
        assert_eq!(cfg.log, LogConfig::default());
    }
}
