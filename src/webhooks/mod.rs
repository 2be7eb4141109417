//! Webhook verification and payload handling.
//!
//! Provides signature verification, typed payload parsing, and the canonical
//! reply shapes for wallet callbacks sent by the game aggregator.

pub mod parser;
pub mod payload;
pub mod response;
pub mod signature;

pub use parser::{NumericPolicy, WebhookPayloadParser};
pub use payload::{IdempotencyKey, RawFields, WebhookPayload, WebhookType};
pub use response::{ResponseBuilder, WebhookReply};
pub use signature::SignatureVerifier;
