//! # batchdeposit-observability
//!
//! OpenTelemetry metrics and tracing setup for the batch depositor.
//!
//! ## Built-in metrics
//! - `batchdeposit.batches_accepted`   counter
//! - `batchdeposit.batches_rejected`   counter, tagged with `kind`
//! - `batchdeposit.deposits_forwarded` counter
//! - `batchdeposit.batch_size`         histogram
//!
//! ## Structured logging
//! Human-readable or JSON logs on stderr, levels configurable per component.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::BatchDepositMetrics;
pub use tracing_setup::{init_tracing, LogConfig};
