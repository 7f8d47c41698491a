//! Store implementations bundled with the core
//!
//! Production deployments plug real persistence in through the
//! [`StoreFactory`](crate::traits::StoreFactory) registry; the core ships the
//! in-memory bundle used by tests and by deployments that accept losing the
//! projection on restart.

pub mod memory;

pub use memory::MemoryStore;

use crate::registry::ConnectorRegistry;

/// Register the built-in store factories
pub fn register(registry: &ConnectorRegistry) {
    registry.register_store("memory", Box::new(memory::MemoryStoreFactory));
}
