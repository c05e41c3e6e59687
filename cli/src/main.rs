//! batchdeposit CLI: check, simulate, and encode validator deposit batches.
//!
//! # Commands
//! ```text
//! batchdeposit validate         --batch <file.json> [--strict]
//! batchdeposit simulate         --batch <file.json> [--start-index N] [--json]
//! batchdeposit plan             --batch <file.json> [--start-index N] [--json]
//! batchdeposit encode-call      --batch <file.json>
//! batchdeposit decode-call      --calldata <hex> --value <wei>
//! batchdeposit decode-revert    --data <hex>
//! batchdeposit constructor-args [--mainnet-deploy [true|false]] [--contract-address <addr>]
//! batchdeposit info
//! ```
//!
//! Batch files are JSON objects with `pubkeys`, `withdrawal_credentials`,
//! `signatures`, `deposit_data_roots`, `collateral` and `value`; `-` reads
//! stdin. A rejected batch exits with status 1 and the revert message.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd_abi;
mod cmd_batch;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(
    name = "batchdeposit",
    about = "Batch validator deposits: validate, simulate, and encode",
    long_about = "
Validate and simulate batches of validator deposits, and produce the calldata,
constructor arguments and revert data of the batch depositor contract.

ENVIRONMENT VARIABLES:
  BATCHDEPOSIT_NETWORK           hardhat | mainnet | holesky | hoodi
  BATCHDEPOSIT_RPC_ENDPOINT_URL  RPC endpoint handed to deploy tooling
  BATCHDEPOSIT_PRIVATE_KEY       Deployer key (never printed)
  RUST_LOG                       Overrides --log-level
",
    version
)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: trace | debug | info | warn | error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit JSON structured logs on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a batch without forwarding anything
    Validate {
        /// Batch JSON file ("-" for stdin)
        #[arg(long)]
        batch: PathBuf,
        /// Reject collateral that is not a whole number of gwei
        #[arg(long)]
        strict: bool,
    },

    /// Deposit a batch into an in-memory ledger and print the events
    Simulate {
        #[arg(long)]
        batch: PathBuf,
        /// Deposit count the ledger already holds
        #[arg(long, default_value_t = 0)]
        start_index: u64,
        #[arg(long)]
        json: bool,
    },

    /// List the outbound ledger calls a batch would make
    Plan {
        #[arg(long)]
        batch: PathBuf,
        #[arg(long, default_value_t = 0)]
        start_index: u64,
        #[arg(long)]
        json: bool,
    },

    /// Encode a batch as entry point calldata
    #[command(name = "encode-call")]
    EncodeCall {
        #[arg(long)]
        batch: PathBuf,
    },

    /// Decode entry point calldata back into a batch
    #[command(name = "decode-call")]
    DecodeCall {
        /// Calldata (0x-prefixed hex)
        #[arg(long)]
        calldata: String,
        /// Attached value in wei (decimal or 0x-hex)
        #[arg(long, default_value = "0")]
        value: String,
    },

    /// Decode revert data returned by the entry point
    #[command(name = "decode-revert")]
    DecodeRevert {
        /// Revert data (0x-prefixed hex)
        #[arg(long)]
        data: String,
        #[arg(long)]
        json: bool,
    },

    /// ABI-encode constructor arguments for deployment
    #[command(name = "constructor-args")]
    ConstructorArgs {
        /// Bind to the canonical mainnet deposit contract; a bare flag means
        /// `true`, omitting it keeps the configured value
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        mainnet_deploy: Option<bool>,
        /// Deposit contract address (defaults to the configured one)
        #[arg(long)]
        contract_address: Option<String>,
    },

    /// Show the resolved deployment and wire constants
    Info,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    config.log.json |= cli.json_logs;
    batchdeposit_observability::init_tracing(&config.log);
    tracing::debug!(network = %config.deployment.network, "configuration loaded");

    match cli.command {
        Commands::Validate { batch, strict } => cmd_batch::validate(&config, &batch, strict),

        Commands::Simulate { batch, start_index, json } => {
            cmd_batch::simulate(&config, &batch, start_index, json)
        }

        Commands::Plan { batch, start_index, json } => {
            cmd_batch::plan(&config, &batch, start_index, json)
        }

        Commands::EncodeCall { batch } => cmd_abi::encode_call(&batch),

        Commands::DecodeCall { calldata, value } => cmd_abi::decode_call(&calldata, &value),

        Commands::DecodeRevert { data, json } => cmd_abi::decode_revert(&data, json),

        Commands::ConstructorArgs { mainnet_deploy, contract_address } => {
            cmd_abi::constructor_args(&config, mainnet_deploy, contract_address.as_deref())
        }

        Commands::Info => cmd_abi::info(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_deploy_accepts_bare_flag_or_value() {
        let parse = |args: &[&str]| match Cli::try_parse_from(args).unwrap().command {
            Commands::ConstructorArgs { mainnet_deploy, .. } => mainnet_deploy,
            _ => panic!("wrong command"),
        };
        assert_eq!(parse(&["batchdeposit", "constructor-args"]), None);
        assert_eq!(parse(&["batchdeposit", "constructor-args", "--mainnet-deploy"]), Some(true));
        assert_eq!(
            parse(&["batchdeposit", "constructor-args", "--mainnet-deploy", "false"]),
            Some(false)
        );
    }
}
