//! Error types for the Go2 client

use thiserror::Error;

/// Result type alias for Go2 client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while driving the robot
#[derive(Debug, Error)]
pub enum Error {
    /// Driver-level connection failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Data-channel transport failure reported by the driver
    #[error("Transport error: {0}")]
    Transport(String),

    /// The robot's command dispatcher rejected a request
    #[error("Command rejected on {topic}: api {api_id} returned status {code}")]
    CommandRejected {
        /// Topic the request was published to
        topic: String,
        /// Numeric command identifier
        api_id: u32,
        /// Non-zero status code from the response header
        code: i32,
    },

    /// No response arrived within the configured deadline
    #[error("Request timeout after {timeout_ms}ms: {context}")]
    RequestTimeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
        /// Additional context
        context: String,
    },

    /// A response payload could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A parameter was outside the range the robot accepts
    #[error("Parameter out of range: {name}={value}, expected {range}")]
    OutOfRange {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: i64,
        /// Accepted range
        range: &'static str,
    },

    /// Audio file handed to the driver does not exist
    #[error("Audio file not found: {path}")]
    AudioFileNotFound {
        /// Path that was not found
        path: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Video frame or display loop failure
    #[error("Video error: {0}")]
    Video(String),
}
