use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::debug;

use super::{EntryDirection, Ledger, LedgerEntry, LedgerOutcome};
use crate::error::{ApiError, Result};
use crate::utils::money::from_minor_units;
use crate::webhooks::IdempotencyKey;

/// In-memory ledger (for development/testing)
///
/// In production, back [`Ledger`] with a database table carrying a unique
/// constraint on the idempotency key.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

#[derive(Default)]
struct LedgerState {
    /// Balances in minor units
    balances: HashMap<String, i64>,
    processed: HashSet<IdempotencyKey>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-populated with `(player_id, balance_minor)` accounts
    pub fn with_accounts<I, S>(accounts: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let state = LedgerState {
            balances: accounts
                .into_iter()
                .map(|(player, minor)| (player.into(), minor))
                .collect(),
            processed: HashSet::new(),
        };

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Create or reset an account
    pub async fn open_account(&self, player_id: impl Into<String>, balance_minor: i64) {
        let mut state = self.state.lock().await;
        state.balances.insert(player_id.into(), balance_minor);
    }

    /// Balance in minor units, for assertions
    pub async fn balance_minor(&self, player_id: &str) -> Option<i64> {
        self.state.lock().await.balances.get(player_id).copied()
    }

    pub async fn is_processed(&self, key: &IdempotencyKey) -> bool {
        self.state.lock().await.processed.contains(key)
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn balance(&self, player_id: &str) -> Result<Option<Decimal>> {
        let state = self.state.lock().await;
        Ok(state.balances.get(player_id).copied().map(from_minor_units))
    }

    async fn apply(&self, entry: LedgerEntry) -> Result<LedgerOutcome> {
        // One lock covers the duplicate check and the write
        let mut state = self.state.lock().await;

        let Some(&current) = state.balances.get(&entry.player_id) else {
            return Ok(LedgerOutcome::PlayerNotFound);
        };

        if state.processed.contains(&entry.key) {
            debug!(key = %entry.key, "Skipping already processed entry");
            return Ok(LedgerOutcome::AlreadyProcessed {
                balance: from_minor_units(current),
            });
        }

        let amount = i64::try_from(entry.amount_minor)
            .map_err(|_| ApiError::Ledger(format!("amount {} out of range", entry.amount_minor)))?;

        let updated = match entry.direction {
            EntryDirection::Debit => {
                if current < amount {
                    return Ok(LedgerOutcome::InsufficientFunds {
                        balance: from_minor_units(current),
                    });
                }
                current - amount
            }
            EntryDirection::Credit => current
                .checked_add(amount)
                .ok_or_else(|| ApiError::Ledger("balance overflow".to_string()))?,
        };

        state.balances.insert(entry.player_id.clone(), updated);
        state.processed.insert(entry.key.clone());

        debug!(
            key = %entry.key,
            player_id = %entry.player_id,
            balance_minor = updated,
            "Ledger entry applied"
        );

        Ok(LedgerOutcome::Applied {
            balance: from_minor_units(updated),
        })
    }
}
