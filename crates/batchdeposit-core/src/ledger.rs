//! The downstream, append-only deposit ledger.
//!
//! The batch depositor never owns ledger state. It appends through
//! [`DepositLedger::deposit`] and relies on checkpoints to undo a partially
//! forwarded batch.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::amount::Gwei;
use crate::error::LedgerRejection;
use crate::types::{BlsSignature, DepositDataRoot, DepositEvent, DepositItem, Pubkey, WithdrawalCredentials};

// Revert reasons of the canonical deposit contract.
pub const REASON_VALUE_TOO_LOW: &str = "DepositContract: deposit value too low";
pub const REASON_VALUE_TOO_HIGH: &str = "DepositContract: deposit value too high";
pub const REASON_TREE_FULL: &str = "DepositContract: merkle tree full";

/// One outbound forwarding call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDeposit {
    pub pubkey: Pubkey,
    pub withdrawal_credentials: WithdrawalCredentials,
    pub signature: BlsSignature,
    pub deposit_data_root: DepositDataRoot,
    /// Amount already converted to the ledger's unit.
    pub amount: Gwei,
    /// Wei attached to the call: the item's collateral, sub-gwei remainder
    /// included.
    pub value: U256,
}

impl LedgerDeposit {
    pub fn new(item: &DepositItem, amount: Gwei) -> Self {
        Self {
            pubkey: item.pubkey,
            withdrawal_credentials: item.withdrawal_credentials,
            signature: item.signature,
            deposit_data_root: item.deposit_data_root,
            amount,
            value: item.collateral,
        }
    }

    /// Value transferred with the call, in wei.
    pub fn value_wei(&self) -> U256 {
        self.value
    }
}

/// A ledger that records deposits and assigns each a global index.
///
/// Implementations must make [`rollback`](DepositLedger::rollback) restore
/// exactly the state observed at the matching
/// [`checkpoint`](DepositLedger::checkpoint), including the deposit count.
pub trait DepositLedger {
    /// Opaque marker for a restorable ledger state.
    type Checkpoint;

    /// Append one deposit. Returns the acknowledgment carrying the index the
    /// ledger assigned, or the ledger's own rejection.
    fn deposit(&mut self, deposit: &LedgerDeposit) -> Result<DepositEvent, LedgerRejection>;

    /// Number of deposits recorded so far (the next index to be assigned).
    fn deposit_count(&self) -> u64;

    fn checkpoint(&self) -> Self::Checkpoint;

    /// Discard everything appended since `checkpoint` was taken.
    fn rollback(&mut self, checkpoint: Self::Checkpoint);
}
