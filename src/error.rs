//! Error types for the ring coach.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors talking to the wearable vendor API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request for {category} failed: {reason}")]
    Transport { category: String, reason: String },

    #[error("Vendor API returned {status} for {category}: {body}")]
    Status {
        category: String,
        status: u16,
        body: String,
    },

    #[error("Invalid JSON for {category}: {reason}")]
    Decode { category: String, reason: String },
}

impl FetchError {
    /// Whether the vendor rejected the bearer token.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Delivery channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to send message on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Authentication failed for channel {name}: {reason}")]
    AuthFailed { name: String, reason: String },

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),
}

/// Insight generation failures, surfaced to the gateway instead of raised.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("model returned an empty insight")]
    Empty,
}

/// Failures that abort processing of a single inbound message.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("Health data aggregation failed: {0}")]
    Aggregation(#[from] FetchError),
}
