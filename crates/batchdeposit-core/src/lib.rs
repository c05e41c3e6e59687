//! batchdeposit-core: validation and all-or-nothing forwarding of validator
//! deposit batches.
//!
//! This crate defines:
//! - [`BatchRequest`]: the five parallel sequences plus attached value a caller submits
//! - [`validate`]: shape, value reconciliation, and field-width checks
//! - [`DepositLedger`]: the downstream ledger trait with checkpoint/rollback
//! - [`forward`]: in-order forwarding under a [`UnitOfWork`]
//! - [`BatchDepositor`]: the entry point bound to one [`DepositorConfig`]
//! - [`InMemoryDepositLedger`]: a ledger mirroring the canonical deposit contract

pub mod amount;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod types;
pub mod unit_of_work;
pub mod validator;

pub use amount::{to_little_endian_64, Gwei, WEI_PER_GWEI};
pub use config::{DeploymentConfig, DepositorConfig, Network, MAINNET_DEPOSIT_CONTRACT};
pub use engine::{forward, BatchDepositor};
pub use error::{AmountError, BatchError, ConfigError, ErrorKind, LedgerRejection, REVERT_PREFIX};
pub use ledger::{DepositLedger, LedgerDeposit};
pub use memory::InMemoryDepositLedger;
pub use types::{BatchReceipt, BatchRequest, DepositEvent, DepositItem, ValidatedBatch};
pub use unit_of_work::{atomically, UnitOfWork};
pub use validator::{validate, ValidationPolicy, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
