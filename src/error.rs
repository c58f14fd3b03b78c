use thiserror::Error;

/// Errors that can occur when working with the haptic bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The platform vibration service could not be obtained
    #[error("vibration service unavailable on this device")]
    PlatformUnavailable,

    /// Malformed or out-of-range invocation arguments
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Action name not recognized by the bridge
    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pattern file carries a format version this crate cannot read
    #[error("unsupported pattern format version: {version}")]
    UnsupportedPatternFormat {
        /// Format version found in the file
        version: u32,
    },
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Check if this error means the platform capability is missing
    #[must_use]
    pub const fn is_platform_error(&self) -> bool {
        matches!(self, Self::PlatformUnavailable)
    }

    /// Check if this error was caused by caller-supplied input
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::UnsupportedAction(_)
                | Self::Json(_)
                | Self::UnsupportedPatternFormat { .. }
        )
    }
}
