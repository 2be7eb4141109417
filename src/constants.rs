//! Application constants and wire-level names.
//!
//! Everything the webhook sender matches on verbatim lives here so the
//! reply shapes and header names are defined in exactly one place.

/// HTTP header names
pub mod headers {
    /// Default header carrying the hex HMAC-SHA256 signature
    pub const SIGNATURE: &str = "X-Signature";

    /// Request id echoed back on every response
    pub const REQUEST_ID: &str = "X-Request-Id";
}

/// Keys used in reply bodies returned to the webhook sender
pub mod reply {
    pub const STATUS: &str = "status";
    pub const BALANCE: &str = "balance";
    pub const ERROR_CODE: &str = "error_code";
    pub const ERROR_MESSAGE: &str = "error_message";
    pub const ALREADY_PROCESSED: &str = "already_processed";

    pub const STATUS_SUCCESS: &str = "success";
    pub const STATUS_ERROR: &str = "error";
}

/// Business error codes carried in `error_code`
pub mod business {
    pub const PLAYER_NOT_FOUND: &str = "PLAYER_NOT_FOUND";
    pub const PLAYER_NOT_FOUND_MESSAGE: &str = "Player not found";

    pub const INSUFFICIENT_FUNDS: &str = "INSUFFICIENT_FUNDS";
    pub const INSUFFICIENT_FUNDS_MESSAGE: &str = "Insufficient funds";

    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const UNSUPPORTED_TYPE: &str = "UNSUPPORTED_TYPE";
}

/// Money handling
pub mod money {
    /// Decimal places between major and minor currency units
    pub const MINOR_UNIT_SCALE: u32 = 2;
}

/// Server defaults
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;

    /// Request timeout in seconds
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Webhook bodies are small JSON objects
    pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

    /// Route receiving signed webhooks
    pub const WEBHOOK_PATH: &str = "/api/v1/webhooks";
}
