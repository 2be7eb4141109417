//! Canonical reply bodies returned to the webhook sender.
//!
//! The sender matches these shapes verbatim, and every balance in them is an
//! integer number of minor units. Conversion from major units happens here
//! and nowhere else.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::{business, reply};
use crate::error::Result;
use crate::utils::money::to_minor_units;

/// A reply body: always a JSON object, always sent with HTTP 200.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WebhookReply(Map<String, Value>);

impl WebhookReply {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get(reply::STATUS).and_then(Value::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.status() == Some(reply::STATUS_SUCCESS)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl IntoResponse for WebhookReply {
    fn into_response(self) -> Response {
        // Business declines are structured bodies, not HTTP failures
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Pure builders for the reply shapes.
///
/// Balances are rounded half away from zero when converted to minor units.
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// `{status: "success", balance: <minor units>, ...extra}`
    ///
    /// `extra` is merged last and may overwrite `status` or `balance`.
    pub fn success(balance_major_units: Decimal, extra: Map<String, Value>) -> Result<WebhookReply> {
        let mut body = Map::new();
        body.insert(reply::STATUS.to_string(), Value::from(reply::STATUS_SUCCESS));
        body.insert(
            reply::BALANCE.to_string(),
            Value::from(to_minor_units(balance_major_units)?),
        );
        body.extend(extra);
        Ok(WebhookReply(body))
    }

    /// `{status: "error", error_code, error_message}`
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> WebhookReply {
        let mut body = Map::new();
        body.insert(reply::STATUS.to_string(), Value::from(reply::STATUS_ERROR));
        body.insert(reply::ERROR_CODE.to_string(), Value::String(code.into()));
        body.insert(reply::ERROR_MESSAGE.to_string(), Value::String(message.into()));
        WebhookReply(body)
    }

    pub fn player_not_found() -> WebhookReply {
        Self::error(
            business::PLAYER_NOT_FOUND,
            business::PLAYER_NOT_FOUND_MESSAGE,
        )
    }

    /// Decline that still reports the current balance
    pub fn insufficient_funds(balance_major_units: Decimal) -> Result<WebhookReply> {
        let mut declined = Self::error(
            business::INSUFFICIENT_FUNDS,
            business::INSUFFICIENT_FUNDS_MESSAGE,
        );
        declined.0.insert(
            reply::BALANCE.to_string(),
            Value::from(to_minor_units(balance_major_units)?),
        );
        Ok(declined)
    }

    /// Idempotent replay of a transaction already applied.
    ///
    /// The sender treats this exactly like a success.
    pub fn already_processed(balance_major_units: Decimal) -> Result<WebhookReply> {
        let mut extra = Map::new();
        extra.insert(reply::ALREADY_PROCESSED.to_string(), Value::Bool(true));
        Self::success(balance_major_units, extra)
    }
}
