//! Revert data produced by the batch entry point.
//!
//! Rejections are `Error(string)` payloads carrying the exact message;
//! collateral overflow is the checked-arithmetic `Panic(0x11)`.

use std::fmt;

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Bytes, U256};
use batchdeposit_core::error::{
    REASON_BATCH_SIZE, REASON_NOT_WHOLE_GWEI, REASON_PARAMETER_COUNT, REASON_PUBKEY_LENGTH,
    REASON_SIGNATURE_LENGTH, REASON_VALUE_MISMATCH, REASON_WITHDRAWAL_CREDENTIALS_LENGTH,
};
use batchdeposit_core::{BatchError, ErrorKind, REVERT_PREFIX};

/// The 4-byte selector for `Error(string)`.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];
/// The 4-byte selector for `Panic(uint256)`.
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];
/// Solidity panic code for arithmetic overflow or underflow.
pub const PANIC_ARITHMETIC_OVERFLOW: u64 = 0x11;

const LEDGER_PREFIX: &str = "DepositContract: ";

/// A decoded revert payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReason {
    /// `Error(string)`
    Message(String),
    /// `Panic(uint256)`
    Panic { code: u64, meaning: &'static str },
}

impl RevertReason {
    /// Taxonomy of a revert produced by the batch entry point, if recognised.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Message(msg) => classify_revert_message(msg),
            Self::Panic { code, .. } if *code == PANIC_ARITHMETIC_OVERFLOW => {
                Some(ErrorKind::ValueReconciliation)
            }
            Self::Panic { .. } => None,
        }
    }
}

impl fmt::Display for RevertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(msg) => write!(f, "reverted: {msg}"),
            Self::Panic { code, meaning } => write!(f, "panic 0x{code:02x}: {meaning}"),
        }
    }
}

/// Revert data the entry point returns for `err`.
pub fn encode_revert(err: &BatchError) -> Bytes {
    let mut out = Vec::with_capacity(100);
    match err {
        BatchError::CollateralOverflow => {
            out.extend_from_slice(&PANIC_SELECTOR);
            out.extend(DynSolValue::Uint(U256::from(PANIC_ARITHMETIC_OVERFLOW), 256).abi_encode());
        }
        other => {
            out.extend_from_slice(&ERROR_STRING_SELECTOR);
            out.extend(DynSolValue::Tuple(vec![DynSolValue::String(other.to_string())]).abi_encode_params());
        }
    }
    out.into()
}

/// Decode `Error(string)` or `Panic(uint256)` revert data.
pub fn decode_revert(data: &[u8]) -> Option<RevertReason> {
    if data.len() < 4 {
        return None;
    }
    let (selector, payload) = data.split_at(4);
    if selector == ERROR_STRING_SELECTOR {
        match DynSolType::String.abi_decode(payload) {
            Ok(DynSolValue::String(s)) => Some(RevertReason::Message(s)),
            _ => None,
        }
    } else if selector == PANIC_SELECTOR {
        match DynSolType::Uint(256).abi_decode(payload) {
            Ok(DynSolValue::Uint(v, _)) => {
                let code = v.saturating_to::<u64>();
                Some(RevertReason::Panic {
                    code,
                    meaning: panic_meaning(code),
                })
            }
            _ => None,
        }
    } else {
        None
    }
}

/// Map a Solidity panic code to a human-readable description.
pub fn panic_meaning(code: u64) -> &'static str {
    match code {
        0x00 => "generic compiler-inserted panic",
        0x01 => "assert() called with false condition",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division or modulo by zero",
        0x32 => "out-of-bounds array access",
        _ => "unknown panic code",
    }
}

/// Map a revert message back to its [`ErrorKind`].
///
/// Own rejections carry the `BatchValidatorDepositor: ` prefix; anything from
/// the deposit ledger is a forwarding rejection.
pub fn classify_revert_message(message: &str) -> Option<ErrorKind> {
    if message.starts_with(LEDGER_PREFIX) {
        return Some(ErrorKind::ForwardingRejected);
    }
    let reason = message.strip_prefix(REVERT_PREFIX)?;
    match reason {
        REASON_BATCH_SIZE | REASON_PARAMETER_COUNT => Some(ErrorKind::Shape),
        REASON_VALUE_MISMATCH => Some(ErrorKind::ValueReconciliation),
        REASON_PUBKEY_LENGTH
        | REASON_WITHDRAWAL_CREDENTIALS_LENGTH
        | REASON_SIGNATURE_LENGTH
        | REASON_NOT_WHOLE_GWEI => Some(ErrorKind::FieldWidth),
        _ => None,
    }
}
