//! TXT record management on a remote DNS API.
//!
//! The remote service is abstracted as the [`DnsApi`] capability: list one page of records,
//! create a record, delete a record by id. [`RecordManager`] builds the DNS-01 semantics on top
//! of it: paginated listing, idempotent creation and value-selective deletion.
//!
//! Two implementations of [`DnsApi`] are provided, [`crate::alidns::AliDnsClient`] talking to
//! Alibaba Cloud DNS, and [`memory::InMemoryDnsApi`] which keeps records in process.

use std::sync::Arc;

pub mod manager;
pub mod memory;

pub use manager::RecordManager;
#[allow(clippy::module_name_repetitions)]
pub use memory::InMemoryDnsApi;

/// The only record type this crate ever lists, creates or deletes.
pub const RECORD_TYPE: &str = "TXT";

/// Number of records requested per page when listing.
pub const PAGE_SIZE: u64 = 100;

/// A TXT record as it exists on the provider.
///
/// Identity for matching purposes is `(name, value)`. Several records may share a name while
/// carrying different values, one per concurrent challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxtRecord {
    /// Provider-assigned opaque identifier.
    pub record_id: String,
    /// Name relative to the zone. Empty for the zone apex.
    pub name: String,
    pub value: String,
}

/// One page of a record listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPage {
    pub records: Vec<TxtRecord>,
    /// Size of the full matching set, if the provider reported one.
    pub total_count: Option<u64>,
}

/// Boxed cause carried by [`ApiError`] variants, whatever transport an implementation uses.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by a [`DnsApi`] implementation.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request to DNS API failed: {0}")]
    Transport(#[source] BoxError),

    /// The provider answered with an API level error, e.g. bad credentials or throttling.
    #[error("DNS API error {code}: {message}")]
    Provider { code: String, message: String },

    #[error("invalid DNS API response: {0}")]
    InvalidResponse(#[source] BoxError),

    #[error("failed to sign DNS API request: {0}")]
    Signing(#[source] BoxError),
}

/// `DynDnsApi` is a type alias for a [`DnsApi`] shared between concurrent challenge requests.
pub type DynDnsApi = Arc<dyn DnsApi + Send + Sync>;

/// An async trait describing the remote DNS record service.
///
/// Implementations must tolerate concurrent calls; callers hold no locks around them.
#[async_trait::async_trait]
pub trait DnsApi {
    /// Fetch one 1-indexed page of records in `zone` matching `name_filter` and `record_type`.
    async fn list_page(
        &self,
        zone: &str,
        name_filter: &str,
        record_type: &str,
        page_number: u64,
        page_size: u64,
    ) -> Result<RecordPage, ApiError>;

    /// Create a record and return its provider-assigned id.
    async fn create(
        &self,
        zone: &str,
        name: &str,
        record_type: &str,
        value: &str,
    ) -> Result<String, ApiError>;

    /// Delete the record with the given id.
    async fn delete(&self, record_id: &str) -> Result<(), ApiError>;
}
