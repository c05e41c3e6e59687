//! `DepositEvent` logs emitted by the deposit ledger.
//!
//! `event DepositEvent(bytes pubkey, bytes withdrawal_credentials, bytes amount,
//! bytes signature, bytes index)`. No parameter is indexed, so topics hold only
//! the signature hash and all five fields live in the data section.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{b256, Bytes, B256};
use batchdeposit_core::DepositEvent;
use serde::{Deserialize, Serialize};

use crate::abi::{fixed_bytes, keccak256};
use crate::error::AbiError;

pub const DEPOSIT_EVENT_SIGNATURE: &str = "DepositEvent(bytes,bytes,bytes,bytes,bytes)";

/// `keccak256("DepositEvent(bytes,bytes,bytes,bytes,bytes)")`
pub const DEPOSIT_EVENT_TOPIC: B256 =
    b256!("649bbc62d0e31342afea4e5cd82d4049e7e1ee912fc0889aa790803be39038c5");

/// A raw log as returned by `eth_getLogs`, minus block metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositLog {
    pub topics: Vec<B256>,
    pub data: Bytes,
}

pub fn deposit_event_topic() -> B256 {
    B256::from(keccak256(DEPOSIT_EVENT_SIGNATURE.as_bytes()))
}

pub fn encode_deposit_log(event: &DepositEvent) -> DepositLog {
    let data = DynSolValue::Tuple(vec![
        DynSolValue::Bytes(event.pubkey.to_vec()),
        DynSolValue::Bytes(event.withdrawal_credentials.to_vec()),
        DynSolValue::Bytes(event.amount.to_vec()),
        DynSolValue::Bytes(event.signature.to_vec()),
        DynSolValue::Bytes(event.index.to_vec()),
    ])
    .abi_encode_params();
    DepositLog {
        topics: vec![DEPOSIT_EVENT_TOPIC],
        data: data.into(),
    }
}

/// Decode a `DepositEvent` log. Fails on a foreign topic0 or on any field
/// whose width differs from the ledger's fixed layout.
pub fn decode_deposit_log(topics: &[B256], data: &[u8]) -> Result<DepositEvent, AbiError> {
    match topics.first() {
        Some(t) if *t == DEPOSIT_EVENT_TOPIC => {}
        other => {
            return Err(AbiError::TopicMismatch {
                expected: DEPOSIT_EVENT_TOPIC,
                got: other.copied(),
            })
        }
    }

    let ty = DynSolType::Tuple(vec![DynSolType::Bytes; 5]);
    let vals = match ty.abi_decode_params(data)? {
        DynSolValue::Tuple(vals) => vals,
        _ => return Err(AbiError::UnexpectedValue { field: "DepositEvent" }),
    };
    let [pubkey, withdrawal_credentials, amount, signature, index]: [DynSolValue; 5] = vals
        .try_into()
        .map_err(|_| AbiError::UnexpectedValue { field: "DepositEvent" })?;

    Ok(DepositEvent {
        pubkey: fixed_bytes::<48>(pubkey, "pubkey")?,
        withdrawal_credentials: fixed_bytes::<32>(withdrawal_credentials, "withdrawal_credentials")?,
        amount: fixed_bytes::<8>(amount, "amount")?,
        signature: fixed_bytes::<96>(signature, "signature")?,
        index: fixed_bytes::<8>(index, "index")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchdeposit_core::{to_little_endian_64, Gwei};
    use batchdeposit_core::types::{BlsSignature, Pubkey};

    fn sample_event() -> DepositEvent {
        DepositEvent {
            pubkey: Pubkey::repeat_byte(0x8e),
            withdrawal_credentials: B256::repeat_byte(0x01),
            amount: Gwei(32_000_000_000).to_le_bytes(),
            signature: BlsSignature::repeat_byte(0xb9),
            index: to_little_endian_64(99),
        }
    }

    #[test]
    fn topic_is_keccak_of_signature() {
        assert_eq!(deposit_event_topic(), DEPOSIT_EVENT_TOPIC);
    }

    #[test]
    fn log_decodes_to_same_event() {
        let event = sample_event();
        let log = encode_deposit_log(&event);
        assert_eq!(log.topics, vec![DEPOSIT_EVENT_TOPIC]);
        let back = decode_deposit_log(&log.topics, &log.data).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.index_u64(), 99);
        assert_eq!(back.amount.to_string(), "0x0040597307000000");
    }

    #[test]
    fn foreign_topic_is_rejected() {
        let log = encode_deposit_log(&sample_event());
        let err = decode_deposit_log(&[B256::ZERO], &log.data).unwrap_err();
        assert!(matches!(err, AbiError::TopicMismatch { got: Some(_), .. }));
        assert!(matches!(
            decode_deposit_log(&[], &log.data),
            Err(AbiError::TopicMismatch { got: None, .. })
        ));
    }

    #[test]
    fn wrong_field_width_is_rejected() {
        let data = DynSolValue::Tuple(vec![
            DynSolValue::Bytes(vec![0; 47]),
            DynSolValue::Bytes(vec![0; 32]),
            DynSolValue::Bytes(vec![0; 8]),
            DynSolValue::Bytes(vec![0; 96]),
            DynSolValue::Bytes(vec![0; 8]),
        ])
        .abi_encode_params();
        let err = decode_deposit_log(&[DEPOSIT_EVENT_TOPIC], &data).unwrap_err();
        assert!(matches!(
            err,
            AbiError::FieldWidth { field: "pubkey", expected: 48, actual: 47 }
        ));
    }
}
