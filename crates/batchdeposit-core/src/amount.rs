//! Unit conversion and little-endian encoding for ledger amounts.
//!
//! Collateral arrives in wei. The deposit ledger accounts in gwei and reports
//! amounts and indices as 8-byte little-endian values.

use alloy_primitives::{FixedBytes, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AmountError;

/// Fine units per ledger unit (wei per gwei).
pub const WEI_PER_GWEI: u64 = 1_000_000_000;

/// An amount in the ledger's native unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Gwei(pub u64);

impl Gwei {
    /// Convert wei to gwei, discarding any sub-gwei remainder.
    pub fn from_wei(wei: U256) -> Result<Self, AmountError> {
        let quotient = wei / U256::from(WEI_PER_GWEI);
        u64::try_from(quotient)
            .map(Self)
            .map_err(|_| AmountError::TooLarge)
    }

    /// Convert wei to gwei, failing when a remainder would be discarded.
    pub fn from_wei_exact(wei: U256) -> Result<Self, AmountError> {
        if !is_whole_gwei(wei) {
            return Err(AmountError::NotWholeGwei);
        }
        Self::from_wei(wei)
    }

    /// The value in wei.
    pub fn to_wei(self) -> U256 {
        U256::from(self.0) * U256::from(WEI_PER_GWEI)
    }

    /// The ledger's 8-byte little-endian representation.
    pub fn to_le_bytes(self) -> FixedBytes<8> {
        to_little_endian_64(self.0)
    }

    pub fn from_le_bytes(bytes: FixedBytes<8>) -> Self {
        Self(from_little_endian_64(bytes))
    }
}

impl fmt::Display for Gwei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gwei", self.0)
    }
}

/// `true` when `wei` is an exact multiple of one gwei.
pub fn is_whole_gwei(wei: U256) -> bool {
    (wei % U256::from(WEI_PER_GWEI)).is_zero()
}

/// Encode `value` as 8 little-endian bytes, zero-padded.
pub fn to_little_endian_64(value: u64) -> FixedBytes<8> {
    FixedBytes(value.to_le_bytes())
}

pub fn from_little_endian_64(bytes: FixedBytes<8>) -> u64 {
    u64::from_le_bytes(bytes.0)
}

/// Sum a list of amounts, returning `None` on 256-bit overflow.
pub fn checked_sum(values: &[U256]) -> Option<U256> {
    values
        .iter()
        .try_fold(U256::ZERO, |acc, v| acc.checked_add(*v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18))
    }

    #[test]
    fn thirty_two_ether_is_thirty_two_billion_gwei() {
        let gwei = Gwei::from_wei(ether(32)).unwrap();
        assert_eq!(gwei, Gwei(32_000_000_000));
        assert_eq!(
            hex::encode(gwei.to_le_bytes()),
            "0040597307000000"
        );
    }

    #[test]
    fn from_wei_floors_remainder() {
        let wei = ether(1) + U256::from(1);
        assert_eq!(Gwei::from_wei(wei).unwrap(), Gwei(1_000_000_000));
        assert_eq!(Gwei::from_wei_exact(wei), Err(AmountError::NotWholeGwei));
    }

    #[test]
    fn from_wei_rejects_oversized_quotient() {
        let wei = U256::from(u64::MAX) * U256::from(WEI_PER_GWEI) + U256::from(WEI_PER_GWEI);
        assert_eq!(Gwei::from_wei(wei), Err(AmountError::TooLarge));
        let max = U256::from(u64::MAX) * U256::from(WEI_PER_GWEI);
        assert_eq!(Gwei::from_wei(max).unwrap(), Gwei(u64::MAX));
    }

    #[test]
    fn little_endian_index_encoding() {
        assert_eq!(hex::encode(to_little_endian_64(0)), "0000000000000000");
        assert_eq!(hex::encode(to_little_endian_64(1)), "0100000000000000");
        assert_eq!(hex::encode(to_little_endian_64(99)), "6300000000000000");
        assert_eq!(from_little_endian_64(to_little_endian_64(0x0102_0304)), 0x0102_0304);
    }

    #[test]
    fn checked_sum_detects_overflow() {
        assert_eq!(checked_sum(&[ether(32), ether(2048)]), Some(ether(2080)));
        assert_eq!(checked_sum(&[]), Some(U256::ZERO));
        assert_eq!(checked_sum(&[U256::MAX, U256::from(1)]), None);
    }

    #[test]
    fn to_wei_inverts_whole_amounts() {
        assert_eq!(Gwei(32_000_000_000).to_wei(), ether(32));
    }
}
