//! `validate`, `simulate` and `plan`: run a batch file through the depositor.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use batchdeposit_core::{
    BatchDepositor, BatchReceipt, BatchRequest, InMemoryDepositLedger, ValidatedBatch,
    ValidationPolicy,
};
use batchdeposit_evm::CallPlanLedger;
use batchdeposit_observability::BatchDepositMetrics;

use crate::config::CliConfig;

/// Read a batch JSON file, or stdin when `path` is `-`.
pub fn read_batch(path: &Path) -> Result<BatchRequest> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading batch from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading batch file {}", path.display()))?
    };
    serde_json::from_str(&content).context("invalid batch JSON")
}

fn depositor(config: &CliConfig) -> BatchDepositor {
    BatchDepositor::new(config.deployment.depositor)
}

fn check_batch(config: &CliConfig, request: &BatchRequest, strict: bool) -> Result<ValidatedBatch> {
    let mut depositor_config = config.deployment.depositor;
    if strict {
        depositor_config = depositor_config.with_policy(ValidationPolicy::Strict);
    }
    Ok(BatchDepositor::new(depositor_config).validate(request)?)
}

fn simulate_batch(config: &CliConfig, request: &BatchRequest, start_index: u64) -> Result<BatchReceipt> {
    let metrics = BatchDepositMetrics::global();
    let mut ledger = InMemoryDepositLedger::starting_at(start_index);

    let outcome = depositor(config).deposit(&mut ledger, request);
    metrics.observe(request.len(), &outcome);
    Ok(outcome?)
}

fn plan_batch(config: &CliConfig, request: &BatchRequest, start_index: u64) -> Result<CallPlanLedger> {
    let depositor = depositor(config);
    let mut ledger = CallPlanLedger::new(depositor.ledger_address(), start_index);
    depositor.deposit(&mut ledger, request)?;
    Ok(ledger)
}

pub fn validate(config: &CliConfig, path: &Path, strict: bool) -> Result<()> {
    let request = read_batch(path)?;
    let batch = check_batch(config, &request, strict)?;

    println!("ok: {} deposits", batch.len());
    println!("  Total:   {} wei", batch.total());
    println!("  Strict:  {strict}");
    Ok(())
}

pub fn simulate(config: &CliConfig, path: &Path, start_index: u64, as_json: bool) -> Result<()> {
    let request = read_batch(path)?;
    let receipt = simulate_batch(config, &request, start_index)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }
    println!("Forwarded {} deposits ({} gwei)", receipt.len(), receipt.total_gwei);
    for event in &receipt.acknowledgments {
        println!(
            "  #{:<6} {}  amount={} ({})",
            event.index_u64(),
            event.pubkey,
            event.amount,
            event.amount_gwei()
        );
    }
    Ok(())
}

pub fn plan(config: &CliConfig, path: &Path, start_index: u64, as_json: bool) -> Result<()> {
    let request = read_batch(path)?;
    let ledger = plan_batch(config, &request, start_index)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(ledger.calls())?);
        return Ok(());
    }
    println!("Target:  {}", ledger.target());
    println!("Calls:   {}", ledger.calls().len());
    println!("Value:   {} wei", ledger.total_value());
    for call in ledger.calls() {
        println!("  #{:<6} value={} calldata={}", call.expected_index, call.value, call.calldata);
    }
    Ok(())
}
