//! Batch depositor metric instruments.

use batchdeposit_core::{BatchError, BatchReceipt, ErrorKind};
use opentelemetry::{
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Central metrics handle for the depositor.
#[derive(Clone)]
pub struct BatchDepositMetrics {
    pub batches_accepted: Counter<u64>,
    pub batches_rejected: Counter<u64>,
    pub deposits_forwarded: Counter<u64>,
    pub batch_size: Histogram<u64>,
}

impl BatchDepositMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            batches_accepted: meter
                .u64_counter("batchdeposit.batches_accepted")
                .with_description("Batches forwarded in full")
                .build(),
            batches_rejected: meter
                .u64_counter("batchdeposit.batches_rejected")
                .with_description("Batches rejected by validation or by the ledger")
                .build(),
            deposits_forwarded: meter
                .u64_counter("batchdeposit.deposits_forwarded")
                .with_description("Individual deposits acknowledged by the ledger")
                .build(),
            batch_size: meter
                .u64_histogram("batchdeposit.batch_size")
                .with_description("Number of items in a submitted batch")
                .build(),
        }
    }

    /// Handle backed by the global meter provider.
    pub fn global() -> Self {
        Self::new(&opentelemetry::global::meter("batchdeposit"))
    }

    pub fn record_accepted(&self, receipt: &BatchReceipt) {
        self.batches_accepted.add(1, &[]);
        self.deposits_forwarded.add(receipt.len() as u64, &[]);
    }

    pub fn record_rejected(&self, kind: ErrorKind) {
        self.batches_rejected
            .add(1, &[KeyValue::new("kind", kind.as_str())]);
    }

    /// Record the size of a submitted batch and its outcome.
    pub fn observe(&self, items: usize, outcome: &Result<BatchReceipt, BatchError>) {
        self.batch_size.record(items as u64, &[]);
        match outcome {
            Ok(receipt) => self.record_accepted(receipt),
            Err(err) => self.record_rejected(err.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_against_noop_provider() {
        let metrics = BatchDepositMetrics::global();
        let receipt = BatchReceipt {
            acknowledgments: Vec::new(),
            total_gwei: 0,
        };
        metrics.observe(0, &Ok(receipt));
        metrics.observe(101, &Err(BatchError::BatchSizeOutOfRange { count: 101 }));
    }
}
