use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::parser::WebhookPayloadParser;
use super::payload::WebhookPayload;
use crate::error::{ApiError, Result};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 webhook verifier with timing-safe comparison
///
/// The signature is the lowercase hex HMAC of the raw request body, usually
/// carried in an `X-Signature` header. The secret is fixed at construction.
///
/// # Example
///
/// ```rust,ignore
/// use game_webhook_gateway::webhooks::SignatureVerifier;
///
/// let verifier = SignatureVerifier::new("s3cr3t")?;
/// let body = br#"{"type":"bet","player_id":"p1","amount":500}"#;
/// let signature = "9f86d0..."; // From X-Signature header
///
/// let payload = verifier.verify_and_parse(body, signature)?;
/// ```
pub struct SignatureVerifier {
    /// HMAC keyed with the shared secret, cloned per signature
    mac: HmacSha256,
    /// Optional prefix to strip from signatures (e.g., "sha256=")
    signature_prefix: Option<String>,
    parser: WebhookPayloadParser,
}

impl SignatureVerifier {
    /// Create a verifier with hex-encoded signatures and a strict parser.
    ///
    /// An empty secret is a configuration error.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ApiError::Configuration(
                "webhook secret must not be empty".to_string(),
            ));
        }

        let mac = HmacSha256::new_from_slice(&secret)
            .map_err(|e| ApiError::Configuration(format!("invalid HMAC secret: {}", e)))?;

        Ok(Self {
            mac,
            signature_prefix: None,
            parser: WebhookPayloadParser::new(),
        })
    }

    /// Strip a prefix such as `sha256=` from signatures when present
    pub fn with_signature_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.signature_prefix = Some(prefix.into());
        self
    }

    /// Parser used by [`verify_and_parse`](Self::verify_and_parse)
    pub fn with_parser(mut self, parser: WebhookPayloadParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn parser(&self) -> &WebhookPayloadParser {
        &self.parser
    }

    /// Lowercase hex HMAC-SHA256 of `raw_body` under this verifier's secret
    pub fn sign(&self, raw_body: &[u8]) -> String {
        hex::encode(self.compute_signature(raw_body))
    }

    /// Check `signature_hex` against the body.
    ///
    /// Exact byte comparison against the lowercase hex HMAC. Never fails:
    /// empty, truncated, uppercase or non-hex signatures are simply invalid.
    pub fn verify(&self, raw_body: &[u8], signature_hex: &str) -> bool {
        let provided = match self.signature_prefix {
            Some(ref prefix) => signature_hex
                .strip_prefix(prefix.as_str())
                .unwrap_or(signature_hex),
            None => signature_hex,
        };

        let expected = self.sign(raw_body);

        constant_time_compare(expected.as_bytes(), provided.as_bytes())
    }

    /// Authenticate, then decode.
    ///
    /// The body is only parsed after the signature has been accepted.
    pub fn verify_and_parse(&self, raw_body: &[u8], signature_hex: &str) -> Result<WebhookPayload> {
        if !self.verify(raw_body, signature_hex) {
            return Err(ApiError::Authentication(
                "webhook signature mismatch".to_string(),
            ));
        }

        self.parser.parse(raw_body)
    }

    fn compute_signature(&self, raw_body: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(raw_body);
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("mac", &"<redacted>")
            .field("signature_prefix", &self.signature_prefix)
            .field("parser", &self.parser)
            .finish()
    }
}

/// Constant-time comparison to prevent timing attacks
///
/// Length mismatch returns early; the length of a hex HMAC is public.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}
