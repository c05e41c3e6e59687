//! Error types for batch validation and forwarding.
//!
//! `Display` on [`BatchError`] is the exact revert message a caller observes,
//! so these strings must stay byte-for-byte stable.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Prefix carried by every revert raised by the batch depositor itself.
pub const REVERT_PREFIX: &str = "BatchValidatorDepositor: ";

pub const REASON_BATCH_SIZE: &str = "you can deposit only 1 to 100 nodes per transaction";
pub const REASON_PARAMETER_COUNT: &str = "amount of parameters do not match";
pub const REASON_VALUE_MISMATCH: &str = "provided ETH does not match required ETH";
pub const REASON_PUBKEY_LENGTH: &str = "incorrect pubkey length";
pub const REASON_WITHDRAWAL_CREDENTIALS_LENGTH: &str = "incorrect withdrawal credentials length";
pub const REASON_SIGNATURE_LENGTH: &str = "incorrect signature length";
pub const REASON_NOT_WHOLE_GWEI: &str = "collateral is not a whole number of gwei";
/// Solidity 0.8 checked arithmetic reverts with `Panic(0x11)`, not a string.
pub const REASON_COLLATERAL_OVERFLOW: &str = "arithmetic overflow or underflow";

// ─── ErrorKind ────────────────────────────────────────────────────────────────

/// Failure taxonomy. Every kind is fatal to the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Count bound or parallel-sequence length violations.
    Shape,
    /// Attached value does not reconcile with the collateral sum.
    ValueReconciliation,
    /// A per-item fixed-width (or unit alignment) violation.
    FieldWidth,
    /// The downstream ledger refused one item.
    ForwardingRejected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shape => "shape",
            Self::ValueReconciliation => "value_reconciliation",
            Self::FieldWidth => "field_width",
            Self::ForwardingRejected => "forwarding_rejected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── LedgerRejection ──────────────────────────────────────────────────────────

/// A refusal raised by the downstream deposit ledger. The reason is bubbled
/// to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{reason}")]
pub struct LedgerRejection {
    pub reason: String,
}

impl LedgerRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

// ─── BatchError ───────────────────────────────────────────────────────────────

/// Why a batch deposit was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("{}{}", REVERT_PREFIX, REASON_BATCH_SIZE)]
    BatchSizeOutOfRange { count: usize },

    #[error("{}{}", REVERT_PREFIX, REASON_PARAMETER_COUNT)]
    ParameterCountMismatch {
        pubkeys: usize,
        withdrawal_credentials: usize,
        signatures: usize,
        deposit_data_roots: usize,
        collateral: usize,
    },

    #[error("{}{}", REVERT_PREFIX, REASON_VALUE_MISMATCH)]
    ValueMismatch { provided: U256, required: U256 },

    #[error("{}", REASON_COLLATERAL_OVERFLOW)]
    CollateralOverflow,

    #[error("{}{}", REVERT_PREFIX, REASON_PUBKEY_LENGTH)]
    IncorrectPubkeyLength { index: usize, len: usize },

    #[error("{}{}", REVERT_PREFIX, REASON_WITHDRAWAL_CREDENTIALS_LENGTH)]
    IncorrectWithdrawalCredentialsLength { index: usize, len: usize },

    #[error("{}{}", REVERT_PREFIX, REASON_SIGNATURE_LENGTH)]
    IncorrectSignatureLength { index: usize, len: usize },

    #[error("{}{}", REVERT_PREFIX, REASON_NOT_WHOLE_GWEI)]
    CollateralNotWholeGwei { index: usize, collateral: U256 },

    #[error("{rejection}")]
    ForwardingRejected {
        index: usize,
        rejection: LedgerRejection,
    },
}

impl BatchError {
    /// Taxonomy bucket of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BatchSizeOutOfRange { .. } | Self::ParameterCountMismatch { .. } => {
                ErrorKind::Shape
            }
            Self::ValueMismatch { .. } | Self::CollateralOverflow => {
                ErrorKind::ValueReconciliation
            }
            Self::IncorrectPubkeyLength { .. }
            | Self::IncorrectWithdrawalCredentialsLength { .. }
            | Self::IncorrectSignatureLength { .. }
            | Self::CollateralNotWholeGwei { .. } => ErrorKind::FieldWidth,
            Self::ForwardingRejected { .. } => ErrorKind::ForwardingRejected,
        }
    }

    /// The bare reason without the contract prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::BatchSizeOutOfRange { .. } => REASON_BATCH_SIZE,
            Self::ParameterCountMismatch { .. } => REASON_PARAMETER_COUNT,
            Self::ValueMismatch { .. } => REASON_VALUE_MISMATCH,
            Self::CollateralOverflow => REASON_COLLATERAL_OVERFLOW,
            Self::IncorrectPubkeyLength { .. } => REASON_PUBKEY_LENGTH,
            Self::IncorrectWithdrawalCredentialsLength { .. } => {
                REASON_WITHDRAWAL_CREDENTIALS_LENGTH
            }
            Self::IncorrectSignatureLength { .. } => REASON_SIGNATURE_LENGTH,
            Self::CollateralNotWholeGwei { .. } => REASON_NOT_WHOLE_GWEI,
            Self::ForwardingRejected { rejection, .. } => &rejection.reason,
        }
    }

    /// Index of the offending item, for per-item failures.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::IncorrectPubkeyLength { index, .. }
            | Self::IncorrectWithdrawalCredentialsLength { index, .. }
            | Self::IncorrectSignatureLength { index, .. }
            | Self::CollateralNotWholeGwei { index, .. }
            | Self::ForwardingRejected { index, .. } => Some(*index),
            _ => None,
        }
    }
}

// ─── AmountError ──────────────────────────────────────────────────────────────

/// Failures converting a wei amount into the ledger's gwei unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount does not fit in 64 bits of gwei")]
    TooLarge,

    #[error("amount is not a whole number of gwei")]
    NotWholeGwei,
}

// ─── ConfigError ──────────────────────────────────────────────────────────────

/// Errors loading deployment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown network: {name}")]
    UnknownNetwork { name: String },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}
