// # zonedelta-core
//
// Core library for the zonedelta record-set change processor.
//
// ## Architecture Overview
//
// This library drives a single requested DNS record-set mutation from a
// queued `Pending` state to a terminal `Complete` or `Failed` state:
//
// - **DnsConnector**: trait for resolving and updating against a zone's
//   authoritative backend
// - **Repositories**: traits for the record-set projection, the audit log,
//   and user-submitted batch changes
// - **ChangeHandler**: orchestrates validate → apply → verify → persist for
//   one change, with wildcard/NS bypass
// - **ConnectorRegistry**: plugin-based registry for connectors and stores
//
// ## Design Principles
//
// 1. **Capabilities over globals**: connectors and repositories are injected;
//    no process-wide singletons
// 2. **Errors as values**: DNS refusals and validation mismatches are data
//    that terminates the change; only infrastructure faults unwind
// 3. **Single-shot collaborators**: the connector performs one backend call
//    per invocation; bounded re-resolution is owned by the handler's verifier
// 4. **Exclusive ownership**: the upstream dispatcher serializes changes per
//    (zone, name, type); one handler run owns its record set

pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod registry;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{ConnectorConfig, HandlerConfig, StoreConfig, VerifyConfig};
pub use error::{Error, Result};
pub use handler::{ChangeHandler, HandlerEvent, ProcessingStatus};
pub use model::{
    BatchChange, ChangeSet, ChangeType, RData, RecordSet, RecordSetChange, RecordType,
    SingleChange, Zone,
};
pub use registry::ConnectorRegistry;
pub use store::MemoryStore;
pub use traits::{DnsConnector, DnsError, DnsResponse, DnsResult, Stores};
