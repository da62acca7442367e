//! Error types.

use crate::records::ApiError;
use axum::extract::rejection::JsonRejection;

/// Error enumerates the possible webhook error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when [`Solver::present`][crate::solver::Solver::present] or
    /// [`Solver::clean_up`][crate::solver::Solver::clean_up] is called before a DNS API client
    /// has been bound with [`Solver::initialize`][crate::solver::Solver::initialize].
    #[error("alidns client not initialized")]
    Uninitialized,

    /// Returned when listing the existing TXT records for a name fails.
    #[error("failed to describe records for \"{name}\" in zone \"{zone}\": {source}")]
    ListRecords {
        zone: String,
        name: String,
        source: ApiError,
    },

    /// Returned when the DNS API rejects or fails to create a TXT record.
    #[error("failed to add TXT record \"{name}\" in zone \"{zone}\": {source}")]
    CreateRecord {
        zone: String,
        name: String,
        source: ApiError,
    },

    /// Returned when deleting a TXT record fails. Records deleted before the failure stay
    /// deleted.
    #[error("failed to delete TXT record {record_id}: {source}")]
    DeleteRecord { record_id: String, source: ApiError },

    /// Returned when a required credential environment variable is missing or empty.
    #[error("missing Alibaba Cloud credentials: {0} is not set")]
    Credentials(&'static str),

    /// Returned when the HTTP client for the DNS API can't be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Returned when a configuration value can't be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when a [`Config`][crate::config::Config] file contains invalid JSON.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),

    /// Returned when a `ChallengePayload` is posted without a `request` object.
    #[error("challenge payload has no request")]
    MissingRequest,

    /// Returned when a webhook request names an API group this webhook isn't serving.
    #[error("unknown API group \"{0}\"")]
    UnknownGroup(String),

    /// Returned when a webhook request names a solver other than
    /// [`Solver::NAME`][crate::solver::Solver::NAME].
    #[error("unknown solver \"{0}\"")]
    UnknownSolver(String),

    /// Returned when clients `POST` invalid JSON.
    #[error(transparent)]
    JsonExtractorRejection(#[from] JsonRejection),
}
