//! Configuration types for the change processor
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// DNS connector configuration
    pub connector: ConnectorConfig,

    /// Repository store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Post-apply verification settings
    #[serde(default)]
    pub verify: VerifyConfig,

    /// Capacity of the handler event channel
    ///
    /// When full, new events are dropped (with a warning log) rather than
    /// blocking the change in flight.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl HandlerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            connector: ConnectorConfig::default(),
            store: StoreConfig::default(),
            verify: VerifyConfig::default(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("event channel capacity must be > 0"));
        }

        self.connector.validate()?;
        self.verify.validate()?;

        Ok(())
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// DNS connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConnectorConfig {
    /// PowerDNS HTTP API connector
    Pdns {
        /// API base URL, e.g. "http://127.0.0.1:8081/api/v1"
        base_url: String,
        /// API key
        api_key: String,
        /// Server id, usually "localhost"
        #[serde(default = "default_pdns_server_id")]
        server_id: String,
    },

    /// Custom connector
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ConnectorConfig {
    /// Validate the connector configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ConnectorConfig::Pdns {
                base_url, api_key, ..
            } => {
                if base_url.is_empty() {
                    return Err(crate::Error::config("PowerDNS base URL cannot be empty"));
                }
                if api_key.is_empty() {
                    return Err(crate::Error::config("PowerDNS API key cannot be empty"));
                }
                Ok(())
            }
            ConnectorConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom connector factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom connector config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the connector type name
    pub fn type_name(&self) -> &str {
        match self {
            ConnectorConfig::Pdns { .. } => "pdns",
            ConnectorConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        ConnectorConfig::Pdns {
            base_url: String::new(),
            api_key: String::new(),
            server_id: default_pdns_server_id(),
        }
    }
}

/// Repository store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-memory stores (not persistent)
    #[default]
    Memory,

    /// Custom store bundle
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl StoreConfig {
    /// Get the store type name
    pub fn type_name(&self) -> &str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Post-apply verification settings
///
/// DNS resolution is eventually consistent; after a successful update the
/// processor polls the backend until it reflects the intended post-state or
/// the attempt budget runs out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Maximum resolve attempts before the change fails verification
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Fixed wait between attempts, in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl VerifyConfig {
    /// Validate the verification settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_attempts == 0 {
            return Err(crate::Error::config("verify max_attempts must be > 0"));
        }
        Ok(())
    }

    /// Backoff as a [`std::time::Duration`]
    pub fn backoff(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.backoff_ms)
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

fn default_max_attempts() -> usize {
    12
}

fn default_backoff_ms() -> u64 {
    100
}

fn default_event_channel_capacity() -> usize {
    1000
}

fn default_pdns_server_id() -> String {
    "localhost".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_defaults() {
        let verify = VerifyConfig::default();
        assert_eq!(verify.max_attempts, 12);
        assert_eq!(verify.backoff_ms, 100);
        assert_eq!(verify.backoff(), std::time::Duration::from_millis(100));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = HandlerConfig::new();
        config.connector = ConnectorConfig::Pdns {
            base_url: "http://127.0.0.1:8081/api/v1".to_string(),
            api_key: "key".to_string(),
            server_id: "localhost".to_string(),
        };
        config.verify.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_pdns_key() {
        let mut config = HandlerConfig::new();
        config.connector = ConnectorConfig::Pdns {
            base_url: "http://127.0.0.1:8081/api/v1".to_string(),
            api_key: String::new(),
            server_id: "localhost".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connector_type_names() {
        assert_eq!(ConnectorConfig::default().type_name(), "pdns");
        let custom = ConnectorConfig::Custom {
            factory: "scripted".to_string(),
            config: serde_json::json!({}),
        };
        assert_eq!(custom.type_name(), "scripted");
        assert_eq!(StoreConfig::Memory.type_name(), "memory");
    }
}
