//! Error types for the harvester.
//!
//! One variant per failure class of the ingestion pipeline, plus `#[from]`
//! carriers for the underlying libraries. Every error is terminal for the
//! run: the pipeline fails fast and surfaces the first error encountered.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Invalid source URL.
    #[error("Invalid source URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidUrl(String),

    /// The server answered with a non-success status.
    #[error("Download failed with HTTP status {status}")]
    Download { status: reqwest::StatusCode },

    /// The archive filename could not be determined from response headers.
    #[error("Cannot determine archive filename: {0}")]
    HeaderParse(String),

    /// The downloaded archive does not contain exactly one document.
    #[error("Unexpected number of archive entries: expected {expected}, found {actual}")]
    ArchiveShape { expected: usize, actual: usize },

    /// The document contains byte sequences the source encoding cannot decode.
    #[error("Undecodable {encoding} byte sequence in {context}")]
    Encoding { encoding: String, context: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The parsed document does not have the expected shape.
    #[error("Unexpected document shape: {0}")]
    Shape(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive reading failed.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Record serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
