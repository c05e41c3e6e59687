//! Batch request, validated item, and acknowledgment types.

use alloy_primitives::{Bytes, FixedBytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::amount::{from_little_endian_64, Gwei};

/// BLS12-381 validator public key (compressed G1 point).
pub type Pubkey = FixedBytes<48>;
/// Withdrawal credentials committed to by a deposit.
pub type WithdrawalCredentials = B256;
/// BLS12-381 signature over the deposit message (compressed G2 point).
pub type BlsSignature = FixedBytes<96>;
/// SSZ hash tree root of the deposit data.
pub type DepositDataRoot = B256;

// ─── BatchRequest ─────────────────────────────────────────────────────────────

/// A caller-submitted batch: five parallel sequences plus the attached value.
///
/// Binary fields other than the data roots are untrusted dynamic bytes; their
/// widths are checked by [`crate::validator::validate`]. Data roots arrive as
/// `bytes32[]` so their width is fixed by the type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    pub pubkeys: Vec<Bytes>,
    pub withdrawal_credentials: Vec<Bytes>,
    pub signatures: Vec<Bytes>,
    pub deposit_data_roots: Vec<B256>,
    #[serde(with = "u256_dec::vec")]
    pub collateral: Vec<U256>,
    /// Value transferred alongside the call, in wei.
    #[serde(rename = "value", with = "u256_dec")]
    pub attached_value: U256,
}

impl BatchRequest {
    pub fn new(
        pubkeys: Vec<Bytes>,
        withdrawal_credentials: Vec<Bytes>,
        signatures: Vec<Bytes>,
        deposit_data_roots: Vec<B256>,
        collateral: Vec<U256>,
        attached_value: U256,
    ) -> Self {
        Self {
            pubkeys,
            withdrawal_credentials,
            signatures,
            deposit_data_roots,
            collateral,
            attached_value,
        }
    }

    /// Number of items, as declared by the pubkey sequence.
    pub fn len(&self) -> usize {
        self.pubkeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pubkeys.is_empty()
    }

    /// Replace the attached value.
    pub fn with_value(mut self, value: U256) -> Self {
        self.attached_value = value;
        self
    }
}

// ─── DepositItem ──────────────────────────────────────────────────────────────

/// One index-aligned tuple, with every binary field at its fixed width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositItem {
    pub pubkey: Pubkey,
    pub withdrawal_credentials: WithdrawalCredentials,
    pub signature: BlsSignature,
    pub deposit_data_root: DepositDataRoot,
    /// Amount to forward, in wei.
    #[serde(with = "u256_dec")]
    pub collateral: U256,
}

// ─── ValidatedBatch ───────────────────────────────────────────────────────────

/// A batch that passed every input check. Only the validator constructs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    items: Vec<DepositItem>,
    total: U256,
}

impl ValidatedBatch {
    pub(crate) fn new(items: Vec<DepositItem>, total: U256) -> Self {
        Self { items, total }
    }

    pub fn items(&self) -> &[DepositItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reconciled collateral sum, equal to the attached value.
    pub fn total(&self) -> U256 {
        self.total
    }
}

// ─── DepositEvent ─────────────────────────────────────────────────────────────

/// Acknowledgment emitted by the ledger for one forwarded item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositEvent {
    pub pubkey: Pubkey,
    pub withdrawal_credentials: WithdrawalCredentials,
    /// Gwei amount, little-endian.
    pub amount: FixedBytes<8>,
    pub signature: BlsSignature,
    /// Ledger-wide deposit index, little-endian.
    pub index: FixedBytes<8>,
}

impl DepositEvent {
    pub fn amount_gwei(&self) -> Gwei {
        Gwei::from_le_bytes(self.amount)
    }

    pub fn index_u64(&self) -> u64 {
        from_little_endian_64(self.index)
    }
}

// ─── BatchReceipt ─────────────────────────────────────────────────────────────

/// Outcome of a fully forwarded batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    /// One acknowledgment per item, in submission order.
    pub acknowledgments: Vec<DepositEvent>,
    /// Sum of forwarded amounts in gwei. Wider than one amount since a full
    /// batch of maximal amounts exceeds `u64`.
    pub total_gwei: u128,
}

impl BatchReceipt {
    pub fn len(&self) -> usize {
        self.acknowledgments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acknowledgments.is_empty()
    }

    /// Global index assigned to the first item, if any.
    pub fn first_index(&self) -> Option<u64> {
        self.acknowledgments.first().map(DepositEvent::index_u64)
    }
}

// ─── serde helpers ────────────────────────────────────────────────────────────

/// `U256` as a decimal string; accepts decimal or `0x`-prefixed hex on input.
pub(crate) mod u256_dec {
    use alloy_primitives::U256;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &U256, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(d)?;
        U256::from_str(raw.trim()).map_err(D::Error::custom)
    }

    pub mod vec {
        use alloy_primitives::U256;
        use serde::{de::Error as _, ser::SerializeSeq, Deserialize, Deserializer, Serializer};
        use std::str::FromStr;

        pub fn serialize<S: Serializer>(values: &[U256], s: S) -> Result<S::Ok, S::Error> {
            let mut seq = s.serialize_seq(Some(values.len()))?;
            for v in values {
                seq.serialize_element(&v.to_string())?;
            }
            seq.end()
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<U256>, D::Error> {
            Vec::<String>::deserialize(d)?
                .iter()
                .map(|raw| U256::from_str(raw.trim()).map_err(D::Error::custom))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_request_json_shape() {
        let json = r#"{
            "pubkeys": ["0x00"],
            "withdrawal_credentials": [],
            "signatures": ["0x0102"],
            "deposit_data_roots": ["0x0678d05c612d015d0b527841e295f91759185dddf7b08640d74e3d933695bac8"],
            "collateral": ["32000000000000000000"],
            "value": "0x1bc16d674ec800000"
        }"#;
        let req: BatchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.len(), 1);
        assert!(req.withdrawal_credentials.is_empty());
        assert_eq!(req.signatures[0].as_ref(), &[0x01, 0x02]);
        assert_eq!(req.collateral[0], req.attached_value);

        let back = serde_json::to_value(&req).unwrap();
        assert_eq!(back["value"], "32000000000000000000");
    }

    #[test]
    fn rejects_malformed_amount() {
        let json = r#"{
            "pubkeys": [], "withdrawal_credentials": [], "signatures": [],
            "deposit_data_roots": [], "collateral": ["32 ether"], "value": "0"
        }"#;
        assert!(serde_json::from_str::<BatchRequest>(json).is_err());
    }

    #[test]
    fn deposit_event_decodes_amount_and_index() {
        let ev = DepositEvent {
            pubkey: Pubkey::ZERO,
            withdrawal_credentials: B256::ZERO,
            amount: Gwei(32_000_000_000).to_le_bytes(),
            signature: BlsSignature::ZERO,
            index: crate::amount::to_little_endian_64(99),
        };
        assert_eq!(ev.amount_gwei(), Gwei(32_000_000_000));
        assert_eq!(ev.index_u64(), 99);
    }
}
