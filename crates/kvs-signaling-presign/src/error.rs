//! Error types for presigned URL signing.
//!
//! Signing is a pure computation, so the only failure modes are malformed
//! input: a base URI that lacks the pieces needed to recompose a signed URL,
//! or a timestamp that cannot be represented as a calendar date.

/// Errors that can occur while producing a presigned signaling URL.
#[derive(Debug, thiserror::Error)]
pub enum PresignError {
    /// The base URI has no scheme or authority, or the signed URI string
    /// could not be re-parsed into a structured URI.
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// The millisecond epoch timestamp falls outside the representable
    /// date range.
    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}
