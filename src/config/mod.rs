use anyhow::Result;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

use crate::constants::{headers, server};
use crate::webhooks::NumericPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub webhook: WebhookConfig,
    pub request_timeout: u64,
    pub max_body_bytes: usize,
    /// Tracing filter directives; `RUST_LOG` takes precedence
    pub log_level: Option<String>,
    /// `LOG_FORMAT=json` switches to JSON log lines
    pub log_json: bool,
    /// Accounts loaded into the in-memory ledger at startup
    pub ledger_seed: Vec<LedgerSeed>,
}

#[derive(Clone)]
pub struct WebhookConfig {
    pub secret: String,
    pub signature_header: String,
    pub signature_prefix: Option<String>,
    pub numeric_policy: NumericPolicy,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &"<redacted>")
            .field("signature_header", &self.signature_header)
            .field("signature_prefix", &self.signature_prefix)
            .field("numeric_policy", &self.numeric_policy)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSeed {
    pub player_id: String,
    /// Major units
    pub balance: Decimal,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("WEBHOOK_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("WEBHOOK_SECRET environment variable is required"))?;

        let numeric_policy = match lookup("NUMERIC_STRING_POLICY") {
            Some(value) => NumericPolicy::from_str(&value).map_err(|e| anyhow::anyhow!(e))?,
            None => NumericPolicy::default(),
        };

        Ok(Config {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            host: lookup("HOST").unwrap_or_else(|| server::DEFAULT_HOST.to_string()),
            port: parse_or("PORT", lookup("PORT"), server::DEFAULT_PORT)?,
            webhook: WebhookConfig {
                secret,
                signature_header: lookup("SIGNATURE_HEADER")
                    .unwrap_or_else(|| headers::SIGNATURE.to_string()),
                signature_prefix: lookup("SIGNATURE_PREFIX").filter(|p| !p.is_empty()),
                numeric_policy,
            },
            request_timeout: parse_or(
                "REQUEST_TIMEOUT",
                lookup("REQUEST_TIMEOUT"),
                server::DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            max_body_bytes: parse_or(
                "MAX_BODY_BYTES",
                lookup("MAX_BODY_BYTES"),
                server::DEFAULT_MAX_BODY_BYTES,
            )?,
            log_level: lookup("LOG_LEVEL").filter(|l| !l.trim().is_empty()),
            log_json: lookup("LOG_FORMAT")
                .map(|f| f.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            ledger_seed: match lookup("LEDGER_SEED") {
                Some(raw) => parse_ledger_seed(&raw)?,
                None => Vec::new(),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
        None => Ok(default),
    }
}

/// `p1:100.00,p2:50` -> two seeds
fn parse_ledger_seed(raw: &str) -> Result<Vec<LedgerSeed>> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (player_id, balance) = item
                .split_once(':')
                .ok_or_else(|| anyhow::anyhow!("LEDGER_SEED entry '{}' must be player:balance", item))?;
            let balance = Decimal::from_str(balance.trim()).map_err(|e| {
                anyhow::anyhow!("LEDGER_SEED balance for '{}' is invalid: {}", player_id, e)
            })?;
            Ok(LedgerSeed {
                player_id: player_id.trim().to_string(),
                balance,
            })
        })
        .collect()
}
