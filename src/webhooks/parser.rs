//! Strict decoding of untrusted webhook bodies into [`WebhookPayload`].
//!
//! Every field is optional on the wire. The parser fails only when the body
//! is not a JSON object or when a present field has the wrong JSON type.
//! Historical field names are resolved through ordered alias tables where
//! the first present, non-null key wins.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use super::payload::{RawFields, WebhookPayload, WebhookType};
use crate::error::{ApiError, Result};

/// Canonical wire keys
pub mod keys {
    pub const TYPE: &str = "type";
    pub const PLAYER_ID: &str = "player_id";
    pub const CURRENCY: &str = "currency";
    pub const GAME_ID: &str = "game_id";
    pub const GAME_TYPE: &str = "game_type";
    pub const TIMESTAMP: &str = "timestamp";
    pub const TRANSACTION_ID: &str = "transaction_id";
    pub const AMOUNT: &str = "amount";
    pub const SESSION_ID: &str = "session_id";
    pub const ROUND_ID: &str = "round_id";
    pub const REWARD_TYPE: &str = "reward_type";
    pub const REWARD_TITLE: &str = "reward_title";
    pub const IS_FREESPIN_ROUND: &str = "is_freespin_round";
    pub const IS_FREESPIN: &str = "is_freespin";
    pub const FREESPIN_ID: &str = "freespin_id";
    pub const BONUS_ID: &str = "bonus_id";
    pub const FREESPIN_TOTAL: &str = "freespin_total";
    pub const FREESPINS_REMAINING: &str = "freespins_remaining";
    pub const FREESPIN_LEFT: &str = "freespin_left";
    pub const FREESPIN_ROUND_NUMBER: &str = "freespin_round_number";
    pub const FREESPIN_TOTAL_WINNINGS: &str = "freespin_total_winnings";
}

/// Alias precedence, highest first
pub const IS_FREESPIN_KEYS: &[&str] = &[keys::IS_FREESPIN_ROUND, keys::IS_FREESPIN];
pub const FREESPIN_ID_KEYS: &[&str] = &[keys::FREESPIN_ID, keys::BONUS_ID];
pub const FREESPINS_REMAINING_KEYS: &[&str] = &[keys::FREESPINS_REMAINING, keys::FREESPIN_LEFT];

/// How numeric fields sent as JSON strings are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumericPolicy {
    /// JSON types must match exactly; `"500"` for `amount` is malformed
    #[default]
    Strict,
    /// Numeric strings are normalized, numbers are accepted for string fields
    Lenient,
}

impl FromStr for NumericPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(NumericPolicy::Strict),
            "lenient" => Ok(NumericPolicy::Lenient),
            other => Err(format!(
                "unknown numeric policy '{}', expected 'strict' or 'lenient'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookPayloadParser {
    numeric_policy: NumericPolicy,
}

impl WebhookPayloadParser {
    /// Strict parser
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_numeric_policy(mut self, policy: NumericPolicy) -> Self {
        self.numeric_policy = policy;
        self
    }

    pub fn numeric_policy(&self) -> NumericPolicy {
        self.numeric_policy
    }

    /// Decode one webhook body.
    ///
    /// Fails with [`ApiError::MalformedPayload`] when the body is not a JSON
    /// object, or [`ApiError::InvalidField`] when a present field has the wrong type.
    pub fn parse(&self, raw_body: &[u8]) -> Result<WebhookPayload> {
        let value: Value = serde_json::from_slice(raw_body)
            .map_err(|e| ApiError::MalformedPayload(format!("invalid JSON: {}", e)))?;

        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(ApiError::MalformedPayload(format!(
                    "expected a JSON object at top level, found {}",
                    json_kind(&other)
                )))
            }
        };

        let fields = FieldReader {
            map: &map,
            policy: self.numeric_policy,
        };

        let webhook_type = fields
            .string(&[keys::TYPE])?
            .map(|t| WebhookType::from_wire(&t));
        let player_id = fields.string(&[keys::PLAYER_ID])?.unwrap_or_default();
        let currency = fields.string(&[keys::CURRENCY])?.unwrap_or_default();
        let game_id = fields.integer(&[keys::GAME_ID])?;
        let game_type = fields.string(&[keys::GAME_TYPE])?;
        let timestamp = fields.string(&[keys::TIMESTAMP])?.unwrap_or_default();

        let transaction_id = fields.integer(&[keys::TRANSACTION_ID])?;
        let amount_minor_units = fields.non_negative(&[keys::AMOUNT])?;
        let session_id = fields.string(&[keys::SESSION_ID])?;
        let round_id = fields.string(&[keys::ROUND_ID])?;

        let reward_type = fields.string(&[keys::REWARD_TYPE])?;
        let reward_title = fields.string(&[keys::REWARD_TITLE])?;

        let is_freespin = fields.boolean(IS_FREESPIN_KEYS)?.unwrap_or(false);
        let freespin_id = fields.string(FREESPIN_ID_KEYS)?;
        let freespin_total = fields.integer(&[keys::FREESPIN_TOTAL])?;
        let freespins_remaining = fields.integer(FREESPINS_REMAINING_KEYS)?;
        let freespin_round_number = fields.integer(&[keys::FREESPIN_ROUND_NUMBER])?;
        let freespin_total_winnings = fields.decimal(&[keys::FREESPIN_TOTAL_WINNINGS])?;

        Ok(WebhookPayload {
            webhook_type,
            player_id,
            currency,
            game_id,
            game_type,
            timestamp,
            transaction_id,
            amount_minor_units,
            session_id,
            round_id,
            reward_type,
            reward_title,
            is_freespin,
            freespin_id,
            freespin_total,
            freespins_remaining,
            freespin_round_number,
            freespin_total_winnings,
            raw: RawFields::new(map),
        })
    }
}

/// Typed field extraction over the decoded map
struct FieldReader<'a> {
    map: &'a Map<String, Value>,
    policy: NumericPolicy,
}

impl<'a> FieldReader<'a> {
    /// First alias present with a non-null value
    fn lookup(&self, aliases: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        aliases.iter().find_map(|key| match self.map.get(*key) {
            None | Some(Value::Null) => None,
            Some(value) => Some((*key, value)),
        })
    }

    fn lenient(&self) -> bool {
        self.policy == NumericPolicy::Lenient
    }

    fn string(&self, aliases: &[&'static str]) -> Result<Option<String>> {
        let Some((key, value)) = self.lookup(aliases) else {
            return Ok(None);
        };
        match value {
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) if self.lenient() => Ok(Some(n.to_string())),
            _ => Err(ApiError::invalid_field(key, "string")),
        }
    }

    fn integer(&self, aliases: &[&'static str]) -> Result<Option<i64>> {
        let Some((key, value)) = self.lookup(aliases) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) if self.lenient() => s.parse::<i64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ApiError::invalid_field(key, "integer"))
    }

    fn non_negative(&self, aliases: &[&'static str]) -> Result<Option<u64>> {
        let Some((key, value)) = self.lookup(aliases) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) if self.lenient() => s.parse::<u64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ApiError::invalid_field(key, "non-negative integer"))
    }

    fn boolean(&self, aliases: &[&'static str]) -> Result<Option<bool>> {
        let Some((key, value)) = self.lookup(aliases) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) if self.lenient() => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            Value::Number(n) if self.lenient() => match n.as_u64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ApiError::invalid_field(key, "boolean"))
    }

    fn decimal(&self, aliases: &[&'static str]) -> Result<Option<Decimal>> {
        let Some((key, value)) = self.lookup(aliases) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => number_to_decimal(n),
            Value::String(s) if self.lenient() => Decimal::from_str(s).ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ApiError::invalid_field(key, "decimal number"))
    }
}

/// Goes through the JSON text form so `12.34` stays exactly `12.34`
fn number_to_decimal(n: &Number) -> Option<Decimal> {
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
