//! Wallet ledger seam.
//!
//! The ledger belongs to the integrator. This module only fixes the interface
//! the dispatcher needs: a balance lookup and an idempotent apply. Business
//! declines come back as [`LedgerOutcome`] values, never as errors.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::webhooks::IdempotencyKey;

pub mod memory;

pub use memory::InMemoryLedger;

/// Direction of a balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDirection {
    /// Bets
    Debit,
    /// Wins, rewards, rollbacks
    Credit,
}

/// One money movement requested by a webhook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Must be unique-constrained by the store
    pub key: IdempotencyKey,
    pub player_id: String,
    pub currency: String,
    pub direction: EntryDirection,
    /// Wire amount in minor units
    pub amount_minor: u64,
}

/// Result of applying an entry. Balances are in major units.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerOutcome {
    Applied { balance: Decimal },
    AlreadyProcessed { balance: Decimal },
    InsufficientFunds { balance: Decimal },
    PlayerNotFound,
}

/// Integrator-owned wallet store
///
/// `apply` must be atomic with respect to the idempotency key: two concurrent
/// deliveries of the same key apply the money movement at most once.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Current balance in major units, `None` for unknown players
    async fn balance(&self, player_id: &str) -> Result<Option<Decimal>>;

    /// Apply an entry exactly once per idempotency key
    async fn apply(&self, entry: LedgerEntry) -> Result<LedgerOutcome>;
}
