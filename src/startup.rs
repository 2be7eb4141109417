//! Application startup and initialization logic.

use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::Config;
use crate::services::{InMemoryLedger, Ledger, WebhookDispatcher};
use crate::utils::money::to_minor_units;
use crate::webhooks::{SignatureVerifier, WebhookPayloadParser};

/// Filter used when neither `RUST_LOG` nor `LOG_LEVEL` is set
pub const DEFAULT_LOG_DIRECTIVES: &str = "game_webhook_gateway=debug,tower_http=debug";

/// Tracing directives: `RUST_LOG`, then the configured level, then the default
pub fn log_directives(config: &Config, rust_log: Option<String>) -> String {
    rust_log
        .filter(|d| !d.trim().is_empty())
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVES.to_string())
}

/// Install the global tracing subscriber
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::new(log_directives(config, std::env::var("RUST_LOG").ok()));

    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Build the verifier from configuration and wire it to `ledger`.
pub fn initialize_app(config: &Config, ledger: Arc<dyn Ledger>) -> Result<AppState> {
    let parser = WebhookPayloadParser::new().with_numeric_policy(config.webhook.numeric_policy);

    let mut verifier = SignatureVerifier::new(config.webhook.secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to create signature verifier: {}", e))?
        .with_parser(parser);
    if let Some(prefix) = &config.webhook.signature_prefix {
        verifier = verifier.with_signature_prefix(prefix.clone());
    }
    info!(
        header = %config.webhook.signature_header,
        numeric_policy = ?config.webhook.numeric_policy,
        "✅ Signature verifier initialized"
    );

    Ok(AppState {
        config: config.clone(),
        verifier: Arc::new(verifier),
        dispatcher: WebhookDispatcher::new(ledger),
        metrics_handle: None,
    })
}

/// In-memory ledger holding the configured seed accounts
pub fn seeded_ledger(config: &Config) -> Result<InMemoryLedger> {
    let accounts = config
        .ledger_seed
        .iter()
        .map(|seed| {
            to_minor_units(seed.balance)
                .map(|minor| (seed.player_id.clone(), minor))
                .map_err(|e| anyhow::anyhow!("Invalid seed balance for {}: {}", seed.player_id, e))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("✅ In-memory ledger initialized with {} accounts", accounts.len());
    Ok(InMemoryLedger::with_accounts(accounts))
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> Result<PrometheusHandle> {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    info!("✅ Prometheus metrics initialized");
    Ok(handle)
}
