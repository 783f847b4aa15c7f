use std::result;

use thiserror::Error;

/// Error types for bibliographic search operations
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML parsing failed at the document level
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// A single record within an otherwise valid document could not be mapped
    #[error("malformed record: {message}")]
    MalformedRecord { message: String },

    /// Generic API error with HTTP status code.
    ///
    /// Also covers NCBI's in-band failures, where a 200 response carries an
    /// `ERROR` field instead of results.
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
}

pub type Result<T> = result::Result<T, SearchError>;
