//! Core capability traits for the change processor
//!
//! This module defines the abstract interfaces all implementations follow.
//!
//! - [`DnsConnector`]: resolve and update against a zone's authoritative backend
//! - [`RecordSetRepository`], [`RecordChangeRepository`], [`BatchChangeRepository`]:
//!   persistence capabilities
//! - [`Stores`]: the repository bundle the processor is constructed with

pub mod connector;
pub mod repository;

pub use connector::{DnsConnector, DnsConnectorFactory, DnsError, DnsResponse, DnsResult};
pub use repository::{
    BatchChangeRepository, RecordChangeRepository, RecordSetRepository, StoreFactory, Stores,
};
