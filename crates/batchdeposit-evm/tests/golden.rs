//! Golden fixture integration tests for batchdeposit-evm.
//!
//! `fixtures/evm/` holds raw wire payloads (logs, ledger calldata) checked
//! byte-for-byte. `fixtures/batches/` requests are pushed through the full
//! calldata -> depositor -> revert data path.

use alloy_primitives::{Bytes, B256, U256};
use batchdeposit_core::ledger::LedgerDeposit;
use batchdeposit_core::{BatchDepositor, BatchRequest, Gwei, InMemoryDepositLedger};
use batchdeposit_evm::{
    classify_revert_message, decode_batch_call, decode_deposit_log, decode_ledger_call,
    decode_revert, encode_batch_call, encode_deposit_log, encode_ledger_call, encode_revert,
    RevertReason,
};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn fixture_path(dir: &str, name: &str) -> std::path::PathBuf {
    let mut p = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("../../fixtures");
    p.push(dir);
    p.push(name);
    p
}

fn load_fixture(dir: &str, name: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(fixture_path(dir, name)).expect("fixture not found");
    serde_json::from_str(&content).expect("invalid fixture JSON")
}

fn hex_field(f: &serde_json::Value, key: &str) -> Vec<u8> {
    let s = f[key].as_str().unwrap_or_else(|| panic!("missing {key}"));
    hex::decode(s.trim_start_matches("0x")).expect("invalid hex")
}

/// Submit the fixture request as calldata and return the revert message the
/// entry point would produce.
fn revert_message_over_the_wire(name: &str) -> (String, serde_json::Value) {
    let f = load_fixture("batches", name);
    let request: BatchRequest = serde_json::from_value(f["request"].clone()).unwrap();

    let calldata = encode_batch_call(&request);
    let decoded = decode_batch_call(&calldata, request.attached_value).unwrap();
    assert_eq!(decoded, request, "{name}: calldata did not preserve the request");

    let mut ledger = InMemoryDepositLedger::new();
    let err = BatchDepositor::default()
        .deposit(&mut ledger, &decoded)
        .expect_err("fixture should be rejected");
    match decode_revert(&encode_revert(&err)) {
        Some(RevertReason::Message(msg)) => (msg, f),
        other => panic!("{name}: expected Error(string), got {other:?}"),
    }
}

// ─── Deposit log ──────────────────────────────────────────────────────────────

#[test]
fn golden_deposit_event_log() {
    let f = load_fixture("evm", "deposit-event-first.json");
    let topics: Vec<B256> = serde_json::from_value(f["topics"].clone()).unwrap();
    let data = hex_field(&f, "data");

    let event = decode_deposit_log(&topics, &data).unwrap();
    assert_eq!(event.pubkey.as_slice(), hex_field(&f, "expectedPubkey"));
    assert_eq!(
        event.withdrawal_credentials.as_slice(),
        hex_field(&f, "expectedWithdrawalCredentials")
    );
    assert_eq!(event.amount.as_slice(), hex_field(&f, "expectedAmount"));
    assert_eq!(event.signature.as_slice(), hex_field(&f, "expectedSignature"));
    assert_eq!(event.index.as_slice(), hex_field(&f, "expectedIndex"));
    assert_eq!(event.amount_gwei(), Gwei(f["expectedAmountGwei"].as_u64().unwrap()));

    let log = encode_deposit_log(&event);
    assert_eq!(log.topics, topics);
    assert_eq!(log.data, Bytes::from(data));
}

#[test]
fn golden_simulated_events_match_fixture_log() {
    let log_fixture = load_fixture("evm", "deposit-event-first.json");
    let batch = load_fixture("batches", "single-deposit.json");
    let request: BatchRequest = serde_json::from_value(batch["request"].clone()).unwrap();

    let mut ledger = InMemoryDepositLedger::new();
    let receipt = BatchDepositor::default().deposit(&mut ledger, &request).unwrap();
    let log = encode_deposit_log(&receipt.acknowledgments[0]);
    assert_eq!(log.data.to_vec(), hex_field(&log_fixture, "data"));
}

// ─── Ledger call ──────────────────────────────────────────────────────────────

#[test]
fn golden_ledger_call() {
    let f = load_fixture("evm", "ledger-call-32eth.json");
    let calldata = hex_field(&f, "calldata");
    let value = U256::from_str_radix(f["value"].as_str().unwrap(), 10).unwrap();

    let deposit: LedgerDeposit = decode_ledger_call(&calldata, value).unwrap();
    assert_eq!(deposit.amount, Gwei(f["expectedAmountGwei"].as_u64().unwrap()));
    assert_eq!(
        deposit.deposit_data_root.as_slice(),
        hex_field(&f, "expectedDepositDataRoot")
    );
    assert_eq!(encode_ledger_call(&deposit).to_vec(), calldata);
}

// ─── Revert data ──────────────────────────────────────────────────────────────

#[test]
fn golden_revert_messages_over_the_wire() {
    for name in [
        "empty-batch.json",
        "oversized-batch.json",
        "missing-withdrawal-credentials.json",
        "missing-signatures.json",
        "missing-deposit-data-roots.json",
        "missing-collateral.json",
        "value-mismatch.json",
        "short-pubkey.json",
        "short-withdrawal-credentials.json",
        "short-signature.json",
        "below-ledger-minimum.json",
    ] {
        let (msg, f) = revert_message_over_the_wire(name);
        assert_eq!(msg, f["expectedError"].as_str().unwrap(), "{name}: message mismatch");
        let kind = classify_revert_message(&msg).expect("unclassified message");
        assert_eq!(kind.as_str(), f["expectedKind"].as_str().unwrap(), "{name}: kind mismatch");
    }
}
