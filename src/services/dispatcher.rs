//! Routes verified webhooks to the ledger and renders the sender's reply.

use std::sync::Arc;

use serde_json::Map;
use tracing::{debug, info};

use super::ledger::{EntryDirection, Ledger, LedgerEntry, LedgerOutcome};
use crate::constants::business;
use crate::error::Result;
use crate::webhooks::{ResponseBuilder, WebhookPayload, WebhookReply, WebhookType};

/// Webhook dispatcher
///
/// Lookups (`authenticate`, `balance_check`) read the balance; transaction
/// kinds become one idempotent [`LedgerEntry`]. Every business outcome is a
/// [`WebhookReply`]; only ledger failures surface as errors.
#[derive(Clone)]
pub struct WebhookDispatcher {
    ledger: Arc<dyn Ledger>,
}

impl WebhookDispatcher {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    pub async fn dispatch(&self, payload: &WebhookPayload) -> Result<WebhookReply> {
        let Some(kind) = payload.webhook_type() else {
            return Ok(ResponseBuilder::error(
                business::UNSUPPORTED_TYPE,
                "Missing webhook type",
            ));
        };

        if payload.player_id().is_empty() {
            return Ok(ResponseBuilder::error(
                business::INVALID_REQUEST,
                "Missing player_id",
            ));
        }

        match kind {
            WebhookType::Authenticate | WebhookType::BalanceCheck => self.lookup(payload).await,
            WebhookType::Bet => self.transact(payload, EntryDirection::Debit).await,
            WebhookType::Win | WebhookType::Reward | WebhookType::Rollback => {
                self.transact(payload, EntryDirection::Credit).await
            }
            WebhookType::Other(other) => Ok(ResponseBuilder::error(
                business::UNSUPPORTED_TYPE,
                format!("Unsupported webhook type: {}", other),
            )),
        }
    }

    async fn lookup(&self, payload: &WebhookPayload) -> Result<WebhookReply> {
        match self.ledger.balance(payload.player_id()).await? {
            Some(balance) => ResponseBuilder::success(balance, Map::new()),
            None => Ok(ResponseBuilder::player_not_found()),
        }
    }

    async fn transact(
        &self,
        payload: &WebhookPayload,
        direction: EntryDirection,
    ) -> Result<WebhookReply> {
        let Some(key) = payload.idempotency_key() else {
            return Ok(ResponseBuilder::error(
                business::INVALID_REQUEST,
                "Missing transaction_id",
            ));
        };
        let Some(amount_minor) = payload.amount_minor_units() else {
            return Ok(ResponseBuilder::error(
                business::INVALID_REQUEST,
                "Missing amount",
            ));
        };

        let entry = LedgerEntry {
            key,
            player_id: payload.player_id().to_string(),
            currency: payload.currency().to_string(),
            direction,
            amount_minor,
        };

        debug!(
            key = %entry.key,
            player_id = %entry.player_id,
            amount_minor = entry.amount_minor,
            freespin = payload.is_freespin(),
            "Applying ledger entry"
        );

        let key = entry.key.clone();
        match self.ledger.apply(entry).await? {
            LedgerOutcome::Applied { balance } => {
                info!(key = %key, "Webhook transaction applied");
                ResponseBuilder::success(balance, Map::new())
            }
            LedgerOutcome::AlreadyProcessed { balance } => {
                info!(key = %key, "Duplicate webhook transaction");
                ResponseBuilder::already_processed(balance)
            }
            LedgerOutcome::InsufficientFunds { balance } => {
                ResponseBuilder::insufficient_funds(balance)
            }
            LedgerOutcome::PlayerNotFound => Ok(ResponseBuilder::player_not_found()),
        }
    }
}
