//! Typed, read-only view over one decoded webhook body.

use std::fmt;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::utils::money::unsigned_to_major_units;

/// Dispatch key carried in the `type` field.
///
/// Unknown values are kept as `Other` so newer sender versions do not
/// break older receivers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WebhookType {
    Authenticate,
    BalanceCheck,
    Bet,
    Win,
    Rollback,
    Reward,
    Other(String),
}

impl WebhookType {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "authenticate" => WebhookType::Authenticate,
            "balance_check" => WebhookType::BalanceCheck,
            "bet" => WebhookType::Bet,
            "win" => WebhookType::Win,
            "rollback" => WebhookType::Rollback,
            "reward" => WebhookType::Reward,
            other => WebhookType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WebhookType::Authenticate => "authenticate",
            WebhookType::BalanceCheck => "balance_check",
            WebhookType::Bet => "bet",
            WebhookType::Win => "win",
            WebhookType::Rollback => "rollback",
            WebhookType::Reward => "reward",
            WebhookType::Other(other) => other,
        }
    }

    /// Kinds that move money and carry a transaction id
    pub fn is_transaction(&self) -> bool {
        matches!(
            self,
            WebhookType::Bet | WebhookType::Win | WebhookType::Rollback | WebhookType::Reward
        )
    }
}

impl fmt::Display for WebhookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for WebhookType {
    fn from(value: &str) -> Self {
        WebhookType::from_wire(value)
    }
}

/// Uniqueness key an integrator's ledger constrains on to avoid double-applying money.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey {
    pub kind: WebhookType,
    pub transaction_id: i64,
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.transaction_id)
    }
}

/// The full decoded body, kept for fields the typed view does not model.
///
/// Read-only: there is no way to mutate the map once a payload is built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawFields(Map<String, Value>);

impl RawFields {
    pub(crate) fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// One inbound webhook, built once per request by
/// [`WebhookPayloadParser`](super::parser::WebhookPayloadParser).
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    pub(crate) webhook_type: Option<WebhookType>,
    pub(crate) player_id: String,
    pub(crate) currency: String,
    pub(crate) game_id: Option<i64>,
    pub(crate) game_type: Option<String>,
    pub(crate) timestamp: String,

    pub(crate) transaction_id: Option<i64>,
    pub(crate) amount_minor_units: Option<u64>,
    pub(crate) session_id: Option<String>,
    pub(crate) round_id: Option<String>,

    pub(crate) reward_type: Option<String>,
    pub(crate) reward_title: Option<String>,

    pub(crate) is_freespin: bool,
    pub(crate) freespin_id: Option<String>,
    pub(crate) freespin_total: Option<i64>,
    pub(crate) freespins_remaining: Option<i64>,
    pub(crate) freespin_round_number: Option<i64>,
    pub(crate) freespin_total_winnings: Option<Decimal>,

    pub(crate) raw: RawFields,
}

impl WebhookPayload {
    pub fn webhook_type(&self) -> Option<&WebhookType> {
        self.webhook_type.as_ref()
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// Three-letter code as sent; not validated
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn game_id(&self) -> Option<i64> {
        self.game_id
    }

    pub fn game_type(&self) -> Option<&str> {
        self.game_type.as_deref()
    }

    /// ISO 8601 as sent; not parsed
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn transaction_id(&self) -> Option<i64> {
        self.transaction_id
    }

    /// Wire amount in cents, never divided
    pub fn amount_minor_units(&self) -> Option<u64> {
        self.amount_minor_units
    }

    /// `amount / 100` in exact decimal arithmetic
    pub fn amount_in_major_units(&self) -> Option<Decimal> {
        self.amount_minor_units.map(unsigned_to_major_units)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn round_id(&self) -> Option<&str> {
        self.round_id.as_deref()
    }

    pub fn reward_type(&self) -> Option<&str> {
        self.reward_type.as_deref()
    }

    pub fn reward_title(&self) -> Option<&str> {
        self.reward_title.as_deref()
    }

    pub fn is_freespin(&self) -> bool {
        self.is_freespin
    }

    pub fn freespin_id(&self) -> Option<&str> {
        self.freespin_id.as_deref()
    }

    pub fn freespin_total(&self) -> Option<i64> {
        self.freespin_total
    }

    pub fn freespins_remaining(&self) -> Option<i64> {
        self.freespins_remaining
    }

    pub fn freespin_round_number(&self) -> Option<i64> {
        self.freespin_round_number
    }

    pub fn freespin_total_winnings(&self) -> Option<Decimal> {
        self.freespin_total_winnings
    }

    pub fn raw(&self) -> &RawFields {
        &self.raw
    }

    pub fn is_transaction(&self) -> bool {
        self.webhook_type
            .as_ref()
            .is_some_and(WebhookType::is_transaction)
    }

    /// Key for money-moving webhooks; `None` for lookups or when the id is missing
    pub fn idempotency_key(&self) -> Option<IdempotencyKey> {
        let kind = self.webhook_type.as_ref().filter(|t| t.is_transaction())?;
        let transaction_id = self.transaction_id?;
        Some(IdempotencyKey {
            kind: kind.clone(),
            transaction_id,
        })
    }
}
