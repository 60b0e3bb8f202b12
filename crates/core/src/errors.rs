use thiserror::Error;

/// Unified error type for the entire coin-dashboard-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network (provider errors) ─────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Data quality ────────────────────────────────────────────────
    #[error("Asset {asset} is missing field '{field}', defaulting to 0")]
    Format {
        asset: String,
        field: String,
    },

    // ── Chart resources ─────────────────────────────────────────────
    #[error("Chart resource error for {asset}: {message}")]
    Resource {
        asset: String,
        message: String,
    },

    // ── Preferences / File ──────────────────────────────────────────
    #[error("Preference storage error: {0}")]
    Storage(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── User input ──────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl CoreError {
    /// `true` for failures of the market data fetch (network or payload).
    /// These are absorbed at the refresh boundary and never reach the view.
    #[must_use]
    pub fn is_provider_error(&self) -> bool {
        matches!(self, CoreError::Api { .. } | CoreError::Network(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full request URL; keep the path only.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
