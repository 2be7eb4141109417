//! Application state shared across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;
use crate::services::WebhookDispatcher;
use crate::webhooks::SignatureVerifier;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Verifier keyed with the webhook secret
    pub verifier: Arc<SignatureVerifier>,
    /// Routes verified payloads to the ledger
    pub dispatcher: WebhookDispatcher,
    /// Prometheus render handle; absent when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}
