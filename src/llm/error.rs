use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while invoking a language model or draining its output stream.
#[derive(Error, Debug)]
pub enum LLMError {
    /// The HTTP transport failed (connection refused, reset, timeout, ...).
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// A response body or stream chunk was not the JSON we expected.
    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// The provider answered with a non-success status code.
    #[error("API error ({status}): {message}")]
    ApiError { status: StatusCode, message: String },

    #[error("Content not found in response: {0}")]
    ContentNotFound(String),

    /// The byte stream closed before the end-of-stream marker arrived.
    #[error("Stream ended before the end-of-stream marker")]
    StreamTruncated,

    #[error("Stream event data is not valid UTF-8")]
    InvalidStreamEncoding,

    #[error("Error: {0}")]
    OtherError(String),
}
