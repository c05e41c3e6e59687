//! Forwarding Engine and the `BatchDepositor` entry point.

use alloy_primitives::Address;
use tracing::{debug, info, info_span, warn};

use crate::amount::Gwei;
use crate::config::DepositorConfig;
use crate::error::{BatchError, LedgerRejection};
use crate::ledger::{DepositLedger, LedgerDeposit, REASON_VALUE_TOO_HIGH};
use crate::types::{BatchReceipt, BatchRequest, ValidatedBatch};
use crate::unit_of_work::atomically;
use crate::validator::validate;

/// Forward every item of `batch` to `ledger`, in index order, as one unit.
///
/// The first rejected item aborts the batch and rolls the ledger back to its
/// state before the first forward.
pub fn forward<L: DepositLedger>(
    ledger: &mut L,
    batch: &ValidatedBatch,
) -> Result<BatchReceipt, BatchError> {
    let result: Result<BatchReceipt, BatchError> = atomically(ledger, |ledger| {
        let mut acknowledgments = Vec::with_capacity(batch.len());
        let mut total = 0u128;

        for (index, item) in batch.items().iter().enumerate() {
            // The ledger refuses amounts it cannot encode in 8 bytes.
            let amount = Gwei::from_wei(item.collateral).map_err(|_| BatchError::ForwardingRejected {
                index,
                rejection: LedgerRejection::new(REASON_VALUE_TOO_HIGH),
            })?;

            let ack = ledger
                .deposit(&LedgerDeposit::new(item, amount))
                .map_err(|rejection| BatchError::ForwardingRejected { index, rejection })?;
            debug!(index, ledger_index = ack.index_u64(), %amount, "deposit forwarded");

            // At most 100 u64 amounts, so the u128 sum cannot overflow.
            total += u128::from(amount.0);
            acknowledgments.push(ack);
        }

        Ok(BatchReceipt {
            acknowledgments,
            total_gwei: total,
        })
    });

    if let Err(err) = &result {
        warn!(index = ?err.index(), "batch forwarding aborted: {err}");
    }
    result
}

/// The batch entry point bound to one deployment.
#[derive(Debug, Clone)]
pub struct BatchDepositor {
    config: DepositorConfig,
}

impl BatchDepositor {
    pub fn new(config: DepositorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DepositorConfig {
        &self.config
    }

    /// Address of the ledger this depositor forwards to.
    pub fn ledger_address(&self) -> Address {
        self.config.ledger_address()
    }

    /// Check `request` without forwarding anything.
    pub fn validate(&self, request: &BatchRequest) -> Result<ValidatedBatch, BatchError> {
        validate(request, self.config.policy())
    }

    /// Validate `request`, then forward every item to `ledger` atomically.
    pub fn deposit<L: DepositLedger>(
        &self,
        ledger: &mut L,
        request: &BatchRequest,
    ) -> Result<BatchReceipt, BatchError> {
        let span = info_span!("batch_deposit", items = request.len(), ledger = %self.ledger_address());
        let _enter = span.enter();

        let batch = self.validate(request)?;
        let receipt = forward(ledger, &batch)?;
        info!(
            items = receipt.len(),
            first_index = ?receipt.first_index(),
            total_gwei = receipt.total_gwei,
            "batch deposited"
        );
        Ok(receipt)
    }
}

impl Default for BatchDepositor {
    fn default() -> Self {
        Self::new(DepositorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDepositLedger;
    use crate::validator::ValidationPolicy;
    use alloy_primitives::{Bytes, B256, U256};

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(1_000_000_000_000_000_000u64)
    }

    fn request(collateral: Vec<U256>) -> BatchRequest {
        let n = collateral.len();
        let value = collateral.iter().fold(U256::ZERO, |a, c| a + *c);
        BatchRequest::new(
            (0..n).map(|i| Bytes::from(vec![i as u8; 48])).collect(),
            vec![Bytes::from(vec![1u8; 32]); n],
            vec![Bytes::from(vec![2u8; 96]); n],
            vec![B256::ZERO; n],
            collateral,
            value,
        )
    }

    #[test]
    fn forwards_in_submission_order() {
        let mut ledger = InMemoryDepositLedger::new();
        let receipt = BatchDepositor::default()
            .deposit(&mut ledger, &request(vec![ether(32), ether(2048)]))
            .unwrap();

        assert_eq!(receipt.len(), 2);
        assert_eq!(receipt.acknowledgments[0].pubkey.as_slice(), &[0u8; 48]);
        assert_eq!(receipt.acknowledgments[1].pubkey.as_slice(), &[1u8; 48]);
        assert_eq!(receipt.acknowledgments[1].index_u64(), 1);
        assert_eq!(receipt.total_gwei, 2_080_000_000_000);
        assert_eq!(ledger.deposit_count(), 2);
    }

    #[test]
    fn ledger_rejection_rolls_back_whole_batch() {
        let mut ledger = InMemoryDepositLedger::starting_at(5);
        let half_ether = ether(1) / U256::from(2);
        let err = BatchDepositor::default()
            .deposit(&mut ledger, &request(vec![ether(32), ether(32), half_ether]))
            .unwrap_err();

        assert_eq!(err.to_string(), "DepositContract: deposit value too low");
        assert_eq!(err.index(), Some(2));
        assert_eq!(ledger.deposit_count(), 5);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn validation_failure_touches_nothing() {
        let mut ledger = InMemoryDepositLedger::new();
        let req = request(vec![ether(32)]).with_value(ether(64));
        let err = BatchDepositor::default().deposit(&mut ledger, &req).unwrap_err();
        assert!(matches!(err, BatchError::ValueMismatch { .. }));
        assert_eq!(ledger.deposit_count(), 0);
    }

    #[test]
    fn oversized_amount_is_rejected_as_the_ledger_would() {
        let huge = U256::from(u64::MAX) * U256::from(1_000_000_000u64) + U256::from(1_000_000_000u64);
        let mut ledger = InMemoryDepositLedger::new();
        let err = BatchDepositor::default()
            .deposit(&mut ledger, &request(vec![ether(32), huge]))
            .unwrap_err();
        assert_eq!(err.to_string(), REASON_VALUE_TOO_HIGH);
        assert_eq!(err.index(), Some(1));
        assert_eq!(ledger.deposit_count(), 0);
    }

    #[test]
    fn receipt_total_exceeds_a_single_amount() {
        let max = U256::from(u64::MAX) * U256::from(1_000_000_000u64);
        let mut ledger = InMemoryDepositLedger::new();
        let receipt = BatchDepositor::default()
            .deposit(&mut ledger, &request(vec![max, max]))
            .unwrap();
        assert_eq!(receipt.total_gwei, 2 * u128::from(u64::MAX));
        assert_eq!(receipt.acknowledgments[1].amount_gwei(), Gwei(u64::MAX));
    }

    #[test]
    fn compatible_policy_floors_sub_gwei_collateral() {
        let odd = ether(32) + U256::from(999_999_999u64);
        let mut ledger = InMemoryDepositLedger::new();
        let receipt = BatchDepositor::default()
            .deposit(&mut ledger, &request(vec![odd]))
            .unwrap();
        assert_eq!(receipt.acknowledgments[0].amount_gwei(), Gwei(32_000_000_000));

        let strict = BatchDepositor::new(DepositorConfig::default().with_policy(ValidationPolicy::Strict));
        let err = strict.deposit(&mut ledger, &request(vec![odd])).unwrap_err();
        assert!(matches!(err, BatchError::CollateralNotWholeGwei { index: 0, .. }));
        assert_eq!(ledger.deposit_count(), 1);
    }
}
