//! Domain-specific error types for the input core.
//!
//! Input races (a move for a pointer we never saw go down, a release of
//! an unmapped contact) are *not* errors: handlers log and skip them.
//! What lands here is configuration trouble, trace decoding failures and
//! wiring defects such as asking for a gamepad adapter that does not exist.

use thiserror::Error;

/// The canonical error type for padlink.
#[derive(Debug, Error)]
pub enum PadError {
    // ── Wiring Errors ────────────────────────────────────────────
    /// A gamepad adapter was requested for a protocol that has none.
    #[error("no gamepad adapter for protocol {0}")]
    UnsupportedProtocol(String),

    /// A protocol name could not be parsed.
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    // ── Configuration Errors ─────────────────────────────────────
    /// A configuration value is outside its valid range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The TOML configuration could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration could not be rendered back to TOML.
    #[error("config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    // ── Trace Errors ─────────────────────────────────────────────
    /// A recorded trace line failed to decode.
    #[error("trace line {line}: {source}")]
    TraceDecode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// JSON encoding or decoding failed outside a trace context.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    // ── I/O and Channel Errors ───────────────────────────────────
    /// The filesystem reported an error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The session command channel closed unexpectedly.
    #[error("channel closed")]
    ChannelClosed,

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for PadError {
    fn from(s: String) -> Self {
        PadError::Other(s)
    }
}

impl From<&str> for PadError {
    fn from(s: &str) -> Self {
        PadError::Other(s.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for PadError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        PadError::ChannelClosed
    }
}
