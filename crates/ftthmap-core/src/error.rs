// ── Core error types ──
//
// User-facing errors from ftthmap-core. Consumers never see raw reqwest or
// serde_json errors; the loader translates transport and decode failures
// into the variants below.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Load errors ──────────────────────────────────────────────────
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("{url} responded with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid address data from {origin}: {message}")]
    Decode { origin: String, message: String },

    #[error("No address records found in {origin}")]
    EmptyDataset { origin: String },

    // ── Source errors ────────────────────────────────────────────────
    #[error("Invalid data source '{input}': {reason}")]
    InvalidSource { input: String, reason: String },

    // ── Output errors ────────────────────────────────────────────────
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
