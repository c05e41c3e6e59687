//! Wire-level commands: calldata, revert data, constructor arguments.

use std::path::Path;
use std::str::FromStr;

use alloy_primitives::{Address, U256};
use anyhow::{anyhow, Context, Result};
use batchdeposit_core::{DepositorConfig, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use batchdeposit_evm::abi::{batch_deposit_selector, BATCH_DEPOSIT_SIGNATURE, LEDGER_DEPOSIT_SIGNATURE};
use batchdeposit_evm::revert::decode_revert as decode_revert_data;
use batchdeposit_evm::{
    decode_batch_call, encode_batch_call, encode_constructor_args, RevertReason,
    DEPOSIT_EVENT_TOPIC, LEDGER_DEPOSIT_SELECTOR,
};

use crate::cmd_batch::read_batch;
use crate::config::CliConfig;

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s)).context("invalid hex")
}

pub fn encode_call(path: &Path) -> Result<()> {
    let request = read_batch(path)?;
    println!("calldata: {}", encode_batch_call(&request));
    println!("value:    {}", request.attached_value);
    Ok(())
}

pub fn decode_call(calldata: &str, value: &str) -> Result<()> {
    let data = parse_hex(calldata)?;
    let value = U256::from_str(value).map_err(|e| anyhow!("invalid value '{value}': {e}"))?;
    let request = decode_batch_call(&data, value)?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

pub fn decode_revert(data: &str, as_json: bool) -> Result<()> {
    let bytes = parse_hex(data)?;
    let reason = decode_revert_data(&bytes)
        .ok_or_else(|| anyhow!("not Error(string) or Panic(uint256) revert data"))?;
    let kind = reason.kind();

    if as_json {
        let json = match &reason {
            RevertReason::Message(msg) => serde_json::json!({
                "type": "error",
                "message": msg,
                "kind": kind.map(|k| k.as_str()),
            }),
            RevertReason::Panic { code, meaning } => serde_json::json!({
                "type": "panic",
                "code": code,
                "meaning": meaning,
                "kind": kind.map(|k| k.as_str()),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{reason}");
        if let Some(kind) = kind {
            println!("  Kind: {kind}");
        }
    }
    Ok(())
}

pub fn constructor_args(
    config: &CliConfig,
    mainnet_deploy: Option<bool>,
    contract_address: Option<&str>,
) -> Result<()> {
    let base = config.deployment.depositor;
    let address = match contract_address {
        Some(a) => Address::from_str(a).with_context(|| format!("invalid address '{a}'"))?,
        None => base.contract_address(),
    };
    let args = DepositorConfig::new(mainnet_deploy.unwrap_or(base.mainnet_deploy()), address);
    println!("{}", encode_constructor_args(&args));
    tracing::info!(ledger = %args.ledger_address(), "constructor arguments encoded");
    Ok(())
}

pub fn info(config: &CliConfig) -> Result<()> {
    let deployment = &config.deployment;
    let depositor = &deployment.depositor;
    println!("batchdeposit v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Deployment:");
    println!("  Network:          {} (chain id {})", deployment.network, deployment.chain_id());
    println!("  RPC endpoint:     {}", deployment.rpc_url);
    println!("  Signer:           {}", if deployment.has_signer() { "configured" } else { "none" });
    println!("  Mainnet deploy:   {}", depositor.mainnet_deploy());
    println!("  Ledger address:   {}", depositor.ledger_address());
    println!("  Policy:           {:?}", depositor.policy());
    println!();
    println!("Wire:");
    println!("  Entry point:      {BATCH_DEPOSIT_SIGNATURE}  0x{}", hex::encode(batch_deposit_selector()));
    println!("  Ledger call:      {LEDGER_DEPOSIT_SIGNATURE}  0x{}", hex::encode(LEDGER_DEPOSIT_SELECTOR));
    println!("  DepositEvent:     {DEPOSIT_EVENT_TOPIC}");
    println!("  Batch size:       {MIN_BATCH_SIZE}..={MAX_BATCH_SIZE}");
    Ok(())
}
