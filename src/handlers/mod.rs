pub mod health;
pub mod webhook;

pub use health::{health_check, metrics};
pub use webhook::receive_webhook;
