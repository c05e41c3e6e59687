//! batchdeposit-evm: the EVM wire surface of the batch validator depositor.
//!
//! - [`abi`]: entry point, ledger call, and constructor calldata
//! - [`revert`]: `Error(string)` / `Panic(uint256)` revert data
//! - [`event`]: `DepositEvent` log encoding
//! - [`plan`]: a dry-run ledger recording outbound calls

pub mod abi;
pub mod error;
pub mod event;
pub mod plan;
pub mod revert;

pub use abi::{
    decode_batch_call, decode_constructor_args, decode_ledger_call, encode_batch_call,
    encode_constructor_args, encode_ledger_call, LEDGER_DEPOSIT_SELECTOR,
};
pub use error::AbiError;
pub use event::{decode_deposit_log, encode_deposit_log, DepositLog, DEPOSIT_EVENT_TOPIC};
pub use plan::{CallPlanLedger, OutboundCall};
pub use revert::{classify_revert_message, decode_revert, encode_revert, RevertReason};
