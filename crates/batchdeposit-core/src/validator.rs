//! Input validation: shape, value, and field-width checks.
//!
//! Check order (first failure aborts, nothing is forwarded):
//! 1. Count bound        → `BatchSizeOutOfRange`
//! 2. Shape agreement    → `ParameterCountMismatch`
//! 3. Value reconcile    → `ValueMismatch` / `CollateralOverflow`
//! 4. Per item, in index order: pubkey, withdrawal credentials, signature
//!    (and gwei alignment under [`ValidationPolicy::Strict`])

use alloy_primitives::{Bytes, FixedBytes};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::amount::{checked_sum, is_whole_gwei};
use crate::error::BatchError;
use crate::types::{BatchRequest, BlsSignature, DepositItem, Pubkey, ValidatedBatch, WithdrawalCredentials};

pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 100;

pub const PUBKEY_LENGTH: usize = 48;
pub const WITHDRAWAL_CREDENTIALS_LENGTH: usize = 32;
pub const SIGNATURE_LENGTH: usize = 96;

/// How strictly collateral amounts are checked before forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Bit-compatible: sub-gwei remainders are silently floored on forward.
    #[default]
    Compatible,
    /// Additionally reject collateral that is not a whole number of gwei.
    Strict,
}

/// Run every input check over `request`.
///
/// On success the returned batch holds fixed-width items in submission order.
pub fn validate(request: &BatchRequest, policy: ValidationPolicy) -> Result<ValidatedBatch, BatchError> {
    let result = validate_inner(request, policy);
    if let Err(err) = &result {
        warn!(kind = %err.kind(), index = ?err.index(), "batch rejected: {err}");
    }
    result
}

fn validate_inner(request: &BatchRequest, policy: ValidationPolicy) -> Result<ValidatedBatch, BatchError> {
    let n = request.pubkeys.len();
    if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&n) {
        return Err(BatchError::BatchSizeOutOfRange { count: n });
    }

    if request.withdrawal_credentials.len() != n
        || request.signatures.len() != n
        || request.deposit_data_roots.len() != n
        || request.collateral.len() != n
    {
        return Err(BatchError::ParameterCountMismatch {
            pubkeys: n,
            withdrawal_credentials: request.withdrawal_credentials.len(),
            signatures: request.signatures.len(),
            deposit_data_roots: request.deposit_data_roots.len(),
            collateral: request.collateral.len(),
        });
    }
    debug!(items = n, "batch shape ok");

    let required = checked_sum(&request.collateral).ok_or(BatchError::CollateralOverflow)?;
    if request.attached_value != required {
        return Err(BatchError::ValueMismatch {
            provided: request.attached_value,
            required,
        });
    }
    debug!(total = %required, "attached value reconciled");

    let mut items = Vec::with_capacity(n);
    for index in 0..n {
        let pubkey: Pubkey = fixed(&request.pubkeys[index]).ok_or_else(|| {
            BatchError::IncorrectPubkeyLength { index, len: request.pubkeys[index].len() }
        })?;
        let withdrawal_credentials: WithdrawalCredentials =
            fixed(&request.withdrawal_credentials[index]).ok_or_else(|| {
                BatchError::IncorrectWithdrawalCredentialsLength {
                    index,
                    len: request.withdrawal_credentials[index].len(),
                }
            })?;
        let signature: BlsSignature = fixed(&request.signatures[index]).ok_or_else(|| {
            BatchError::IncorrectSignatureLength { index, len: request.signatures[index].len() }
        })?;

        let collateral = request.collateral[index];
        if policy == ValidationPolicy::Strict && !is_whole_gwei(collateral) {
            return Err(BatchError::CollateralNotWholeGwei { index, collateral });
        }

        items.push(DepositItem {
            pubkey,
            withdrawal_credentials,
            signature,
            deposit_data_root: request.deposit_data_roots[index],
            collateral,
        });
    }

    Ok(ValidatedBatch::new(items, required))
}

/// Narrow dynamic bytes to a fixed width, or `None` on any other length.
fn fixed<const N: usize>(bytes: &Bytes) -> Option<FixedBytes<N>> {
    FixedBytes::<N>::try_from(bytes.as_ref()).ok()
}
