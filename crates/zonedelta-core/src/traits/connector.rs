// # DNS Connector Trait
//
// Defines the interface to the authoritative DNS backend of a zone: resolve
// the current state of a record set, and submit a dynamic update.
//
// ## Result channels
//
// Connector methods carry two distinct failure channels and implementations
// must keep them separate:
//
// - `Err(Error)`: infrastructure faults (transport failures, broken
//   responses). These unwind out of the processor and leave the change
//   `Pending` for redelivery.
// - `Ok(Err(DnsError))`: the zone's own refusal or failure rcode. These are
//   anticipated outcomes; the processor converts them into a terminal
//   `Failed` change, never into a panic or an `Err`.
//
// ## Implementations
//
// - PowerDNS HTTP API: `zonedelta-connector-pdns` crate
// - Test doubles with scripted answers live in the core's contract tests

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ConnectorConfig;
use crate::error::Result;
use crate::model::{RecordSet, RecordSetChange, RecordType};

/// DNS-level failure reported by the zone's authority
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsError {
    /// The server refused the operation
    #[error("refused: {0}")]
    Refused(String),

    /// The requester is not authorized for this zone
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// The server failed to process the request
    #[error("server failure: {0}")]
    ServerFailure(String),

    /// The request or an answer was malformed
    #[error("format error: {0}")]
    FormatError(String),

    /// The target zone is unknown to the server
    #[error("not zone: {0}")]
    NotZone(String),
}

/// Successful response classes from a dynamic update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsResponse {
    /// The update was accepted
    NoError,
}

/// Outcome of a DNS-level operation: the zone's answer, or its refusal
pub type DnsResult<T> = std::result::Result<T, DnsError>;

/// Trait for authoritative DNS backend connectors
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Single-shot contract
///
/// Connectors perform exactly one backend interaction per call and never
/// retry, back off, or cache: bounded re-resolution is owned by the change
/// processor's verifier, and redelivery of infrastructure faults is owned by
/// the upstream queue. A connector that retries internally breaks the
/// processor's resolver-call accounting.
#[async_trait]
pub trait DnsConnector: Send + Sync {
    /// Look up the live record sets for `(name, type)` against the zone's
    /// primary
    ///
    /// An empty list means the name/type pair does not exist; it is not an
    /// error on either channel.
    async fn dns_resolve(
        &self,
        name: &str,
        zone_name: &str,
        record_type: RecordType,
    ) -> Result<DnsResult<Vec<RecordSet>>>;

    /// Submit the change as a dynamic update to the zone's primary
    async fn dns_update(&self, change: &RecordSetChange) -> Result<DnsResult<DnsResponse>>;

    /// Connector name for logging/debugging
    fn connector_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS connectors from configuration
pub trait DnsConnectorFactory: Send + Sync {
    /// Create a connector instance from configuration
    fn create(&self, config: &ConnectorConfig) -> Result<Box<dyn DnsConnector>>;
}
