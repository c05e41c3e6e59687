//! Calldata for the batch entry point, the ledger call, and the constructor.
//!
//! Entry point: `deposit(bytes[],bytes[],bytes[],bytes32[],uint256[])`, payable.
//! Ledger:      `deposit(bytes,bytes,bytes,bytes32)`, payable, value in wei.
//! Constructor: `(bool mainnetDeploy, address contractAddress)`.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Bytes, FixedBytes, U256};
use batchdeposit_core::ledger::LedgerDeposit;
use batchdeposit_core::{BatchRequest, DepositorConfig, Gwei};
use tracing::trace;

use crate::error::AbiError;

pub const BATCH_DEPOSIT_SIGNATURE: &str = "deposit(bytes[],bytes[],bytes[],bytes32[],uint256[])";
pub const LEDGER_DEPOSIT_SIGNATURE: &str = "deposit(bytes,bytes,bytes,bytes32)";

/// `keccak256("deposit(bytes,bytes,bytes,bytes32)")[..4]`
pub const LEDGER_DEPOSIT_SELECTOR: [u8; 4] = [0x22, 0x89, 0x51, 0x18];

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    use tiny_keccak::{Hasher, Keccak};
    let mut k = Keccak::v256();
    k.update(data);
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    out
}

/// First four bytes of the keccak-256 of a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let h = keccak256(signature.as_bytes());
    [h[0], h[1], h[2], h[3]]
}

pub fn batch_deposit_selector() -> [u8; 4] {
    selector(BATCH_DEPOSIT_SIGNATURE)
}

fn batch_param_types() -> DynSolType {
    let bytes_array = || DynSolType::Array(Box::new(DynSolType::Bytes));
    DynSolType::Tuple(vec![
        bytes_array(),
        bytes_array(),
        bytes_array(),
        DynSolType::Array(Box::new(DynSolType::FixedBytes(32))),
        DynSolType::Array(Box::new(DynSolType::Uint(256))),
    ])
}

fn with_selector(selector: [u8; 4], params: Vec<u8>) -> Bytes {
    let mut calldata = Vec::with_capacity(4 + params.len());
    calldata.extend_from_slice(&selector);
    calldata.extend_from_slice(&params);
    calldata.into()
}

fn split_selector(calldata: &[u8], expected: [u8; 4]) -> Result<&[u8], AbiError> {
    if calldata.len() < 4 {
        return Err(AbiError::TooShort { len: calldata.len() });
    }
    if calldata[..4] != expected {
        return Err(AbiError::SelectorMismatch {
            expected: Bytes::copy_from_slice(&expected),
            got: Bytes::copy_from_slice(&calldata[..4]),
        });
    }
    Ok(&calldata[4..])
}

// ─── Batch entry point ────────────────────────────────────────────────────────

/// Encode `request` as calldata for the batch entry point. The attached value
/// travels with the transaction, not the calldata.
pub fn encode_batch_call(request: &BatchRequest) -> Bytes {
    let bytes_array = |items: &[Bytes]| {
        DynSolValue::Array(items.iter().map(|b| DynSolValue::Bytes(b.to_vec())).collect())
    };
    let params = DynSolValue::Tuple(vec![
        bytes_array(&request.pubkeys),
        bytes_array(&request.withdrawal_credentials),
        bytes_array(&request.signatures),
        DynSolValue::Array(
            request
                .deposit_data_roots
                .iter()
                .map(|r| DynSolValue::FixedBytes(*r, 32))
                .collect(),
        ),
        DynSolValue::Array(
            request
                .collateral
                .iter()
                .map(|c| DynSolValue::Uint(*c, 256))
                .collect(),
        ),
    ]);
    with_selector(batch_deposit_selector(), params.abi_encode_params())
}

/// Decode batch entry point calldata sent with `value` wei attached.
///
/// Widths of the dynamic `bytes` fields are not checked here; that is the
/// validator's job.
pub fn decode_batch_call(calldata: &[u8], value: U256) -> Result<BatchRequest, AbiError> {
    let params = split_selector(calldata, batch_deposit_selector())?;
    let decoded = batch_param_types().abi_decode_params(params)?;
    let mut fields = match decoded {
        DynSolValue::Tuple(vals) if vals.len() == 5 => vals.into_iter(),
        _ => return Err(AbiError::UnexpectedValue { field: "parameters" }),
    };
    let mut next = |field| fields.next().ok_or(AbiError::UnexpectedValue { field });

    let pubkeys = bytes_items(next("pubkeys")?, "pubkeys")?;
    let withdrawal_credentials = bytes_items(next("withdrawal_credentials")?, "withdrawal_credentials")?;
    let signatures = bytes_items(next("signatures")?, "signatures")?;
    let deposit_data_roots = array_items(next("deposit_data_roots")?, "deposit_data_roots", |v| match v {
        DynSolValue::FixedBytes(word, 32) => Some(word),
        _ => None,
    })?;
    let collateral = array_items(next("collateral")?, "collateral", |v| match v {
        DynSolValue::Uint(u, _) => Some(u),
        _ => None,
    })?;

    trace!(items = pubkeys.len(), "decoded batch calldata");
    Ok(BatchRequest::new(
        pubkeys,
        withdrawal_credentials,
        signatures,
        deposit_data_roots,
        collateral,
        value,
    ))
}

fn array_items<T>(
    value: DynSolValue,
    field: &'static str,
    item: impl Fn(DynSolValue) -> Option<T>,
) -> Result<Vec<T>, AbiError> {
    match value {
        DynSolValue::Array(vals) => vals
            .into_iter()
            .map(|v| item(v).ok_or(AbiError::UnexpectedValue { field }))
            .collect(),
        _ => Err(AbiError::UnexpectedValue { field }),
    }
}

fn bytes_items(value: DynSolValue, field: &'static str) -> Result<Vec<Bytes>, AbiError> {
    array_items(value, field, |v| match v {
        DynSolValue::Bytes(b) => Some(Bytes::from(b)),
        _ => None,
    })
}

// ─── Ledger call ──────────────────────────────────────────────────────────────

/// Calldata for one forwarded deposit. The amount is the call value
/// ([`LedgerDeposit::value_wei`]).
pub fn encode_ledger_call(deposit: &LedgerDeposit) -> Bytes {
    let params = DynSolValue::Tuple(vec![
        DynSolValue::Bytes(deposit.pubkey.to_vec()),
        DynSolValue::Bytes(deposit.withdrawal_credentials.to_vec()),
        DynSolValue::Bytes(deposit.signature.to_vec()),
        DynSolValue::FixedBytes(deposit.deposit_data_root, 32),
    ]);
    with_selector(LEDGER_DEPOSIT_SELECTOR, params.abi_encode_params())
}

/// Decode a ledger call sent with `value` wei attached.
pub fn decode_ledger_call(calldata: &[u8], value: U256) -> Result<LedgerDeposit, AbiError> {
    let params = split_selector(calldata, LEDGER_DEPOSIT_SELECTOR)?;
    let ty = DynSolType::Tuple(vec![
        DynSolType::Bytes,
        DynSolType::Bytes,
        DynSolType::Bytes,
        DynSolType::FixedBytes(32),
    ]);
    let vals = match ty.abi_decode_params(params)? {
        DynSolValue::Tuple(vals) => vals,
        _ => return Err(AbiError::UnexpectedValue { field: "parameters" }),
    };
    let [pubkey, withdrawal_credentials, signature, root]: [DynSolValue; 4] = vals
        .try_into()
        .map_err(|_| AbiError::UnexpectedValue { field: "parameters" })?;

    let deposit_data_root = match root {
        DynSolValue::FixedBytes(word, 32) => word,
        _ => return Err(AbiError::UnexpectedValue { field: "deposit_data_root" }),
    };
    let amount = Gwei::from_wei(value).map_err(|_| AbiError::UnexpectedValue { field: "value" })?;

    Ok(LedgerDeposit {
        pubkey: fixed_bytes::<48>(pubkey, "pubkey")?,
        withdrawal_credentials: fixed_bytes::<32>(withdrawal_credentials, "withdrawal_credentials")?,
        signature: fixed_bytes::<96>(signature, "signature")?,
        deposit_data_root,
        amount,
        value,
    })
}

pub(crate) fn fixed_bytes<const N: usize>(
    value: DynSolValue,
    field: &'static str,
) -> Result<FixedBytes<N>, AbiError> {
    match value {
        DynSolValue::Bytes(b) => {
            let actual = b.len();
            FixedBytes::<N>::try_from(b.as_slice()).map_err(|_| AbiError::FieldWidth {
                field,
                expected: N,
                actual,
            })
        }
        _ => Err(AbiError::UnexpectedValue { field }),
    }
}

// ─── Constructor ──────────────────────────────────────────────────────────────

/// ABI-encoded constructor arguments `(bool, address)` for `config`.
pub fn encode_constructor_args(config: &DepositorConfig) -> Bytes {
    DynSolValue::Tuple(vec![
        DynSolValue::Bool(config.mainnet_deploy()),
        DynSolValue::Address(config.contract_address()),
    ])
    .abi_encode_params()
    .into()
}

/// Decode constructor arguments back into a [`DepositorConfig`] (default policy).
pub fn decode_constructor_args(data: &[u8]) -> Result<DepositorConfig, AbiError> {
    let ty = DynSolType::Tuple(vec![DynSolType::Bool, DynSolType::Address]);
    match ty.abi_decode_params(data)? {
        DynSolValue::Tuple(vals) => match vals.as_slice() {
            [DynSolValue::Bool(mainnet), DynSolValue::Address(addr)] => {
                Ok(DepositorConfig::new(*mainnet, *addr))
            }
            _ => Err(AbiError::UnexpectedValue { field: "constructor arguments" }),
        },
        _ => Err(AbiError::UnexpectedValue { field: "constructor arguments" }),
    }
}
