//! In-memory `DepositLedger` implementation.
//!
//! Mirrors the observable behaviour of the canonical deposit contract: an
//! append-only event log, a global deposit counter, and its amount and
//! capacity checks. Signature and deposit-root verification are out of scope.

use tracing::trace;

use crate::amount::{to_little_endian_64, Gwei};
use crate::error::LedgerRejection;
use crate::ledger::{DepositLedger, LedgerDeposit, REASON_TREE_FULL, REASON_VALUE_TOO_LOW};
use crate::types::DepositEvent;

/// Smallest deposit the canonical contract accepts (1 ether).
pub const MIN_DEPOSIT: Gwei = Gwei(1_000_000_000);
/// Capacity of the canonical contract's 32-level deposit tree.
pub const MAX_DEPOSIT_COUNT: u64 = (1 << 32) - 1;

/// Restorable state of an [`InMemoryDepositLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCheckpoint {
    events: usize,
    deposit_count: u64,
}

/// Deposit ledger held entirely in memory.
#[derive(Debug, Clone)]
pub struct InMemoryDepositLedger {
    events: Vec<DepositEvent>,
    deposit_count: u64,
    min_deposit: Gwei,
}

impl InMemoryDepositLedger {
    /// An empty ledger whose first deposit gets index 0.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// An empty log whose counter resumes at `deposit_count`, as when
    /// simulating against a ledger that already holds deposits.
    pub fn starting_at(deposit_count: u64) -> Self {
        Self {
            events: Vec::new(),
            deposit_count,
            min_deposit: MIN_DEPOSIT,
        }
    }

    /// Override the minimum accepted amount (test networks sometimes differ).
    pub fn with_min_deposit(mut self, min: Gwei) -> Self {
        self.min_deposit = min;
        self
    }

    /// Acknowledgments in the order they were recorded.
    pub fn events(&self) -> &[DepositEvent] {
        &self.events
    }
}

impl Default for InMemoryDepositLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl DepositLedger for InMemoryDepositLedger {
    type Checkpoint = MemoryCheckpoint;

    fn deposit(&mut self, deposit: &LedgerDeposit) -> Result<DepositEvent, LedgerRejection> {
        if deposit.amount < self.min_deposit {
            return Err(LedgerRejection::new(REASON_VALUE_TOO_LOW));
        }
        if self.deposit_count >= MAX_DEPOSIT_COUNT {
            return Err(LedgerRejection::new(REASON_TREE_FULL));
        }

        let event = DepositEvent {
            pubkey: deposit.pubkey,
            withdrawal_credentials: deposit.withdrawal_credentials,
            amount: deposit.amount.to_le_bytes(),
            signature: deposit.signature,
            index: to_little_endian_64(self.deposit_count),
        };
        trace!(index = self.deposit_count, amount = %deposit.amount, "deposit recorded");

        self.deposit_count += 1;
        self.events.push(event.clone());
        Ok(event)
    }

    fn deposit_count(&self) -> u64 {
        self.deposit_count
    }

    fn checkpoint(&self) -> MemoryCheckpoint {
        MemoryCheckpoint {
            events: self.events.len(),
            deposit_count: self.deposit_count,
        }
    }

    fn rollback(&mut self, checkpoint: MemoryCheckpoint) {
        self.events.truncate(checkpoint.events);
        self.deposit_count = checkpoint.deposit_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlsSignature, Pubkey};
    use alloy_primitives::B256;

    fn deposit(gwei: u64) -> LedgerDeposit {
        LedgerDeposit {
            pubkey: Pubkey::repeat_byte(0x8e),
            withdrawal_credentials: B256::repeat_byte(0x01),
            signature: BlsSignature::repeat_byte(0xb9),
            deposit_data_root: B256::ZERO,
            amount: Gwei(gwei),
            value: Gwei(gwei).to_wei(),
        }
    }

    #[test]
    fn assigns_increasing_indices() {
        let mut ledger = InMemoryDepositLedger::new();
        let a = ledger.deposit(&deposit(32_000_000_000)).unwrap();
        let b = ledger.deposit(&deposit(2_048_000_000_000)).unwrap();
        assert_eq!(a.index_u64(), 0);
        assert_eq!(b.index_u64(), 1);
        assert_eq!(b.amount_gwei(), Gwei(2_048_000_000_000));
        assert_eq!(ledger.deposit_count(), 2);
        assert_eq!(ledger.events().len(), 2);
    }

    #[test]
    fn rejects_below_minimum() {
        let mut ledger = InMemoryDepositLedger::new();
        let err = ledger.deposit(&deposit(999_999_999)).unwrap_err();
        assert_eq!(err.reason, REASON_VALUE_TOO_LOW);
        assert_eq!(ledger.deposit_count(), 0);

        let mut relaxed = InMemoryDepositLedger::new().with_min_deposit(Gwei(1));
        assert!(relaxed.deposit(&deposit(1)).is_ok());
    }

    #[test]
    fn rejects_when_tree_full() {
        let mut ledger = InMemoryDepositLedger::starting_at(MAX_DEPOSIT_COUNT);
        let err = ledger.deposit(&deposit(32_000_000_000)).unwrap_err();
        assert_eq!(err.reason, REASON_TREE_FULL);
    }

    #[test]
    fn rollback_restores_counter_and_log() {
        let mut ledger = InMemoryDepositLedger::starting_at(7);
        ledger.deposit(&deposit(32_000_000_000)).unwrap();
        let cp = ledger.checkpoint();
        ledger.deposit(&deposit(32_000_000_000)).unwrap();
        ledger.deposit(&deposit(32_000_000_000)).unwrap();
        ledger.rollback(cp);
        assert_eq!(ledger.deposit_count(), 8);
        assert_eq!(ledger.events().len(), 1);
        assert_eq!(ledger.events()[0].index_u64(), 7);
    }
}
