//! Plugin-based connector and store registry
//!
//! The registry allows DNS connectors and store bundles to be registered
//! dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Registration
//!
//! Implementations register themselves during initialization:
//!
//! ```rust,ignore
//! // In zonedelta-connector-pdns
//! pub fn register(registry: &ConnectorRegistry) {
//!     registry.register_connector("pdns", Box::new(PdnsConnectorFactory));
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::{ConnectorConfig, StoreConfig};
use crate::error::{Error, Result};
use crate::traits::{DnsConnector, DnsConnectorFactory, StoreFactory, Stores};

/// Registry for plugin-based connector and store creation
///
/// Maintains maps of type names to factory objects, allowing dynamic
/// instantiation based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ConnectorRegistry {
    /// Registered DNS connector factories
    connectors: RwLock<HashMap<String, Box<dyn DnsConnectorFactory>>>,

    /// Registered store factories
    stores: RwLock<HashMap<String, Arc<dyn StoreFactory>>>,
}

impl ConnectorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS connector factory under a type name
    pub fn register_connector(
        &self,
        name: impl Into<String>,
        factory: Box<dyn DnsConnectorFactory>,
    ) {
        let name = name.into();
        let mut connectors = self.connectors.write().unwrap();
        connectors.insert(name, factory);
    }

    /// Register a store factory under a type name
    pub fn register_store(&self, name: impl Into<String>, factory: Box<dyn StoreFactory>) {
        let name = name.into();
        let mut stores = self.stores.write().unwrap();
        stores.insert(name, Arc::from(factory));
    }

    /// Create a DNS connector from configuration
    pub fn create_connector(&self, config: &ConnectorConfig) -> Result<Box<dyn DnsConnector>> {
        let connector_type = config.type_name();
        let connectors = self.connectors.read().unwrap();

        let factory = connectors.get(connector_type).ok_or_else(|| {
            Error::config(format!("Unknown connector type: {}", connector_type))
        })?;

        factory.create(config)
    }

    /// Create a store bundle from configuration
    pub fn create_store(&self, config: &StoreConfig) -> Result<Stores> {
        let store_type = config.type_name();
        let factory = {
            let stores = self.stores.read().unwrap();
            stores
                .get(store_type)
                .ok_or_else(|| Error::config(format!("Unknown store type: {}", store_type)))?
                .clone()
        };

        let config_json = serde_json::to_value(config)?;
        factory.create(&config_json)
    }

    /// List all registered connector types
    pub fn list_connectors(&self) -> Vec<String> {
        let connectors = self.connectors.read().unwrap();
        connectors.keys().cloned().collect()
    }

    /// List all registered store types
    pub fn list_stores(&self) -> Vec<String> {
        let stores = self.stores.read().unwrap();
        stores.keys().cloned().collect()
    }

    /// Check if a connector type is registered
    pub fn has_connector(&self, name: &str) -> bool {
        let connectors = self.connectors.read().unwrap();
        connectors.contains_key(name)
    }

    /// Check if a store type is registered
    pub fn has_store(&self, name: &str) -> bool {
        let stores = self.stores.read().unwrap();
        stores.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockConnectorFactory;

    impl DnsConnectorFactory for MockConnectorFactory {
        fn create(&self, _config: &ConnectorConfig) -> Result<Box<dyn DnsConnector>> {
            Err(Error::config("mock connector not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ConnectorRegistry::new();

        assert!(!registry.has_connector("mock"));

        registry.register_connector("mock", Box::new(MockConnectorFactory));

        assert!(registry.has_connector("mock"));
        assert!(registry.list_connectors().contains(&"mock".to_string()));
    }

    #[test]
    fn test_unknown_types_are_config_errors() {
        let registry = ConnectorRegistry::new();
        assert!(registry
            .create_connector(&ConnectorConfig::default())
            .is_err());
        assert!(registry.create_store(&StoreConfig::Memory).is_err());
    }

    #[test]
    fn test_memory_store_factory_round_trip() {
        let registry = ConnectorRegistry::new();
        crate::store::register(&registry);
        assert!(registry.has_store("memory"));
        assert!(registry.create_store(&StoreConfig::Memory).is_ok());
    }
}
