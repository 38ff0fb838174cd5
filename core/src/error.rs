//! Error types for the XIVAPI client.
//!
//! # Design
//! Two families share one enum. Remote errors map 1:1 from the HTTP status
//! XIVAPI returned. Precondition errors are raised by the `build_*` methods
//! before a request exists, so a malformed call never reaches the transport.
//! Callers branch on the variant; the `Display` text is for humans.

use thiserror::Error;

/// Errors returned by request builders, the response dispatcher and the
/// transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 400.
    #[error("request was bad, please check your parameters")]
    BadRequest,

    /// The server returned 401.
    #[error("request was refused, possibly due to an invalid API key")]
    Forbidden,

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned 500.
    #[error("an internal server error has occurred on XIVAPI")]
    ServerError,

    /// The server returned 503. XIVAPI answers this way while the Lodestone
    /// is under maintenance.
    #[error("service is unavailable, the Lodestone may be under maintenance")]
    ServiceUnavailable,

    /// Any status the dispatcher has no dedicated variant for.
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("\"{0}\" is not a valid language code for XIVAPI")]
    InvalidLanguage(String),

    #[error("please specify at least one index to search, e.g. \"Recipe\"")]
    InvalidIndex,

    #[error("please specify at least one column to return in the resulting data")]
    InvalidColumns,

    #[error("\"{0}\" is not a valid filter comparison")]
    InvalidFilter(String),

    #[error("expected between 1 and 15 world names, got {0}")]
    InvalidWorlds(usize),

    #[error("please provide the name of a datacenter, e.g. \"Chaos\" or \"Aether\"")]
    InvalidDatacenter,

    #[error("\"{0}\" is not a supported string_algo for XIVAPI")]
    InvalidAlgo(String),

    /// A 200 response whose body was not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The transport failed before a status code was available.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// True for errors raised locally before any network I/O.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidLanguage(_)
                | ApiError::InvalidIndex
                | ApiError::InvalidColumns
                | ApiError::InvalidFilter(_)
                | ApiError::InvalidWorlds(_)
                | ApiError::InvalidDatacenter
                | ApiError::InvalidAlgo(_)
        )
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}
