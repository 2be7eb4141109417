//! Signed webhook receiver.

use axum::{body::Bytes, extract::State, http::HeaderMap};
use metrics::counter;
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::error::Result;
use crate::utils::{extract_signature, extract_source_ip};
use crate::webhooks::{WebhookReply, WebhookType};

/// Receive one wallet callback.
///
/// 401 when the signature does not match, 400 when the verified body is
/// malformed, otherwise 200 with the dispatcher's reply (including business
/// declines such as insufficient funds).
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<WebhookReply> {
    let signature = extract_signature(&headers, &state.config.webhook.signature_header);

    let payload = match state.verifier.verify_and_parse(&body, &signature) {
        Ok(payload) => payload,
        Err(e) => {
            let outcome = if e.is_authentication() {
                "unauthorized"
            } else {
                "malformed"
            };
            warn!(
                source_ip = ?extract_source_ip(&headers),
                body_len = body.len(),
                outcome,
                "Webhook rejected"
            );
            counter!("webhook_requests_total", "type" => "unknown", "outcome" => outcome)
                .increment(1);
            return Err(e);
        }
    };

    let type_label = metric_type_label(payload.webhook_type());

    info!(
        webhook_type = ?payload.webhook_type(),
        player_id = %payload.player_id(),
        transaction_id = ?payload.transaction_id(),
        "Webhook accepted"
    );

    let reply = state.dispatcher.dispatch(&payload).await?;

    let outcome = if reply.is_success() { "success" } else { "declined" };
    counter!("webhook_requests_total", "type" => type_label, "outcome" => outcome).increment(1);

    Ok(reply)
}

/// Bounded `type` label: sender-defined kinds collapse to `other`
fn metric_type_label(kind: Option<&WebhookType>) -> &'static str {
    match kind {
        None => "unknown",
        Some(WebhookType::Authenticate) => "authenticate",
        Some(WebhookType::BalanceCheck) => "balance_check",
        Some(WebhookType::Bet) => "bet",
        Some(WebhookType::Win) => "win",
        Some(WebhookType::Rollback) => "rollback",
        Some(WebhookType::Reward) => "reward",
        Some(WebhookType::Other(_)) => "other",
    }
}
