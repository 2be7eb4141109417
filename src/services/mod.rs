// Business logic services
// Webhook dispatch and the wallet ledger seam

pub mod dispatcher;
pub mod ledger;

pub use dispatcher::WebhookDispatcher;
pub use ledger::{EntryDirection, InMemoryLedger, Ledger, LedgerEntry, LedgerOutcome};
