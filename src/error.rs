//! Error types for the thermostat skill

use thiserror::Error;

/// Result type alias for skill operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that fail an invocation
///
/// Device call failures are not represented here: they are recovered into a
/// spoken sentence via [`crate::device::DeviceActionResult::Failure`].
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Request came from an application other than the configured one
    #[error("invalid application id: {0}")]
    InvalidApplication(String),

    /// Intent name is not in the dispatch table
    #[error("unrecognized intent: {0}")]
    UnrecognizedIntent(String),

    /// Intent is missing a slot its action requires
    #[error("missing slot: {0}")]
    MissingSlot(&'static str),

    /// Request envelope is structurally incomplete
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether the error was caused by the caller's request rather than the skill
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedIntent(_) | Self::MissingSlot(_) | Self::MalformedRequest(_)
        )
    }
}
