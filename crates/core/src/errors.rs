use thiserror::Error;

/// Unified error type for the entire vault-dashboard-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Chart pipeline ──────────────────────────────────────────────
    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("No valid data received from any asset")]
    NoValidData,

    #[error("No valid data points after processing")]
    NoDataPoints,

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Merged point at {timestamp} is missing a value for {asset}")]
    IncompletePoint { timestamp: String, asset: String },

    #[error("Chart request #{sequence} superseded by request #{latest}")]
    Superseded { sequence: u64, latest: u64 },

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("HTTP error ({provider}): status {status}")]
    HttpStatus { provider: String, status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    // ── Decoding ────────────────────────────────────────────────────
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Configuration / Input ───────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl CoreError {
    /// Errors that a "try again" action in the UI can reasonably recover from.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::NoValidData
                | CoreError::NoDataPoints
                | CoreError::Network(_)
                | CoreError::HttpStatus { .. }
                | CoreError::Api { .. }
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL; the user address lives in the query.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
