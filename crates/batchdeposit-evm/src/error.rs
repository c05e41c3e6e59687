use alloy_primitives::{Bytes, B256};
use thiserror::Error;

/// Failures while encoding or decoding EVM payloads.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("payload too short: {len} bytes")]
    TooShort { len: usize },

    #[error("selector mismatch: expected {expected}, got {got}")]
    SelectorMismatch { expected: Bytes, got: Bytes },

    #[error("ABI decode failed: {0}")]
    Decode(#[from] alloy_core::dyn_abi::Error),

    #[error("unexpected ABI value for {field}")]
    UnexpectedValue { field: &'static str },

    #[error("{field} must be {expected} bytes, got {actual}")]
    FieldWidth {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("expected topic0 {expected}, got {got:?}")]
    TopicMismatch { expected: B256, got: Option<B256> },
}
