//! Dry-run ledger that records the outbound calls a batch would make.

use alloy_primitives::{Address, Bytes, U256};
use batchdeposit_core::ledger::{DepositLedger, LedgerDeposit};
use batchdeposit_core::{to_little_endian_64, DepositEvent, LedgerRejection};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::abi::encode_ledger_call;

/// One call the depositor would send to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundCall {
    pub to: Address,
    /// Wei transferred with the call.
    pub value: U256,
    pub calldata: Bytes,
    /// Index the ledger is expected to assign.
    pub expected_index: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanCheckpoint {
    calls: usize,
    deposit_count: u64,
}

/// A [`DepositLedger`] that accepts every deposit and records the call.
///
/// Indices are assigned locally from the deposit count the plan starts at.
/// None of the ledger's own amount rules are applied; pair it with
/// simulation against an in-memory ledger when those matter.
#[derive(Debug, Clone)]
pub struct CallPlanLedger {
    target: Address,
    calls: Vec<OutboundCall>,
    deposit_count: u64,
}

impl CallPlanLedger {
    pub fn new(target: Address, deposit_count: u64) -> Self {
        Self {
            target,
            calls: Vec::new(),
            deposit_count,
        }
    }

    pub fn target(&self) -> Address {
        self.target
    }

    pub fn calls(&self) -> &[OutboundCall] {
        &self.calls
    }

    /// Sum of wei sent across all recorded calls.
    pub fn total_value(&self) -> U256 {
        self.calls.iter().fold(U256::ZERO, |acc, c| acc.saturating_add(c.value))
    }
}

impl DepositLedger for CallPlanLedger {
    type Checkpoint = PlanCheckpoint;

    fn deposit(&mut self, deposit: &LedgerDeposit) -> Result<DepositEvent, LedgerRejection> {
        let index = self.deposit_count;
        let call = OutboundCall {
            to: self.target,
            value: deposit.value_wei(),
            calldata: encode_ledger_call(deposit),
            expected_index: index,
        };
        trace!(index, to = %call.to, value = %call.value, "call planned");
        self.calls.push(call);
        self.deposit_count += 1;

        Ok(DepositEvent {
            pubkey: deposit.pubkey,
            withdrawal_credentials: deposit.withdrawal_credentials,
            amount: deposit.amount.to_le_bytes(),
            signature: deposit.signature,
            index: to_little_endian_64(index),
        })
    }

    fn deposit_count(&self) -> u64 {
        self.deposit_count
    }

    fn checkpoint(&self) -> PlanCheckpoint {
        PlanCheckpoint {
            calls: self.calls.len(),
            deposit_count: self.deposit_count,
        }
    }

    fn rollback(&mut self, checkpoint: PlanCheckpoint) {
        self.calls.truncate(checkpoint.calls);
        self.deposit_count = checkpoint.deposit_count;
    }
}
