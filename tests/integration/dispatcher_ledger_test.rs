// Dispatcher and ledger integration tests
// Exercises the public service API without the HTTP layer

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use game_webhook_gateway::{
    error::{ApiError, Result},
    services::{EntryDirection, InMemoryLedger, Ledger, LedgerEntry, LedgerOutcome, WebhookDispatcher},
    webhooks::{NumericPolicy, SignatureVerifier, WebhookPayloadParser},
};

fn verifier() -> SignatureVerifier {
    SignatureVerifier::new("dispatch-secret").unwrap()
}

async fn deliver(dispatcher: &WebhookDispatcher, verifier: &SignatureVerifier, body: Value) -> Value {
    let raw = body.to_string();
    let signature = verifier.sign(raw.as_bytes());
    let payload = verifier.verify_and_parse(raw.as_bytes(), &signature).unwrap();
    dispatcher.dispatch(&payload).await.unwrap().into_value()
}

#[tokio::test]
async fn test_freespin_reward_round() {
    let ledger = InMemoryLedger::with_accounts([("p1", 0)]);
    let dispatcher = WebhookDispatcher::new(Arc::new(ledger.clone()));
    let verifier = verifier();

    let reply = deliver(
        &dispatcher,
        &verifier,
        json!({
            "type": "reward",
            "player_id": "p1",
            "currency": "EUR",
            "amount": 1234,
            "transaction_id": 5,
            "reward_type": "freespin",
            "reward_title": "Welcome spins",
            "is_freespin": true,
            "bonus_id": "fs-9",
            "freespin_left": 3,
            "freespin_total_winnings": 12.34
        }),
    )
    .await;

    assert_eq!(reply, json!({"status": "success", "balance": 1234}));
    assert_eq!(ledger.balance_minor("p1").await, Some(1234));
}

#[tokio::test]
async fn test_lenient_policy_accepts_numeric_strings() {
    let ledger = InMemoryLedger::with_accounts([("p1", 1000)]);
    let dispatcher = WebhookDispatcher::new(Arc::new(ledger.clone()));
    let verifier = verifier().with_parser(
        WebhookPayloadParser::new().with_numeric_policy(NumericPolicy::Lenient),
    );

    let reply = deliver(
        &dispatcher,
        &verifier,
        json!({"type": "bet", "player_id": "p1", "amount": "300", "transaction_id": "8"}),
    )
    .await;

    assert_eq!(reply, json!({"status": "success", "balance": 700}));
}

#[tokio::test]
async fn test_concurrent_duplicate_deliveries_debit_once() {
    let ledger = InMemoryLedger::with_accounts([("p1", 5000)]);
    let dispatcher = WebhookDispatcher::new(Arc::new(ledger.clone()));
    let verifier = Arc::new(verifier());
    let body = json!({"type": "bet", "player_id": "p1", "amount": 1000, "transaction_id": 77});

    let mut handles = Vec::new();
    for _ in 0..8 {
        let dispatcher = dispatcher.clone();
        let verifier = verifier.clone();
        let body = body.clone();
        handles.push(tokio::spawn(async move {
            deliver(&dispatcher, &verifier, body).await
        }));
    }

    let mut replays = 0;
    for handle in handles {
        let reply = handle.await.unwrap();
        assert_eq!(reply["balance"], 4000);
        if reply.get("already_processed").is_some() {
            replays += 1;
        }
    }

    assert_eq!(replays, 7);
    assert_eq!(ledger.balance_minor("p1").await, Some(4000));
}

/// Ledger keyed by player with fractional-cent balances, used to check the
/// reply rounding at the trait seam
#[derive(Default)]
struct DecimalLedger {
    balances: Mutex<HashMap<String, Decimal>>,
}

#[async_trait]
impl Ledger for DecimalLedger {
    async fn balance(&self, player_id: &str) -> Result<Option<Decimal>> {
        Ok(self.balances.lock().await.get(player_id).copied())
    }

    async fn apply(&self, entry: LedgerEntry) -> Result<LedgerOutcome> {
        let mut balances = self.balances.lock().await;
        let Some(balance) = balances.get_mut(&entry.player_id) else {
            return Ok(LedgerOutcome::PlayerNotFound);
        };
        let amount = Decimal::new(entry.amount_minor as i64, 2);
        match entry.direction {
            EntryDirection::Debit => *balance -= amount,
            EntryDirection::Credit => *balance += amount,
        }
        Ok(LedgerOutcome::Applied { balance: *balance })
    }
}

#[tokio::test]
async fn test_custom_ledger_balance_is_rounded_half_away_from_zero() {
    let ledger = DecimalLedger::default();
    ledger
        .balances
        .lock()
        .await
        .insert("p1".to_string(), dec!(10.005));
    let dispatcher = WebhookDispatcher::new(Arc::new(ledger));

    let reply = deliver(
        &dispatcher,
        &verifier(),
        json!({"type": "balance_check", "player_id": "p1"}),
    )
    .await;

    assert_eq!(reply, json!({"status": "success", "balance": 1001}));
}

struct OfflineLedger;

#[async_trait]
impl Ledger for OfflineLedger {
    async fn balance(&self, _player_id: &str) -> Result<Option<Decimal>> {
        Err(ApiError::Ledger("wallet service timed out".to_string()))
    }

    async fn apply(&self, _entry: LedgerEntry) -> Result<LedgerOutcome> {
        Err(ApiError::Ledger("wallet service timed out".to_string()))
    }
}

#[tokio::test]
async fn test_ledger_outage_is_an_error_not_a_reply() {
    let dispatcher = WebhookDispatcher::new(Arc::new(OfflineLedger));
    let verifier = verifier();
    let raw = br#"{"type":"bet","player_id":"p1","amount":1,"transaction_id":1}"#;
    let payload = verifier
        .verify_and_parse(raw, &verifier.sign(raw))
        .unwrap();

    let err = dispatcher.dispatch(&payload).await.unwrap_err();
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
}
