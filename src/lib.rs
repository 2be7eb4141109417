pub mod app_state;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod services;
pub mod startup;
pub mod utils;
pub mod webhooks;

pub use app_state::AppState;
pub use config::Config;
pub use error::ApiError;
pub use services::{InMemoryLedger, Ledger, WebhookDispatcher};
pub use webhooks::{ResponseBuilder, SignatureVerifier, WebhookPayload, WebhookPayloadParser};
