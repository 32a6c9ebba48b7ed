use thiserror::Error;

/// Central error type for gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced an HTTP response.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The remote service answered with a non-success status.
    #[error("API error (status {status_code}): {message}")]
    Api { message: String, status_code: u16 },

    /// The response body could not be read or decoded.
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// First-run setup could not materialize a prerequisite. Fatal to the caller.
    #[error("Setup error: {message}")]
    Install {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The interactive credential prompt could not be read.
    #[error("Failed to read credential from prompt")]
    Prompt {
        #[source]
        source: std::io::Error,
    },

    /// No candidate credential passed remote validation within the attempt
    /// budget. Carries the last validation failure as its cause.
    #[error("Credential rejected after {attempts} attempt(s)")]
    CredentialRejected {
        attempts: u32,
        #[source]
        source: Box<GatewayError>,
    },
}
