//! Zone reference carried by a change
//!
//! The processor never reads or rewrites zones; it only needs enough identity
//! to resolve against the zone's authority and key repository lookups.

use serde::{Deserialize, Serialize};

/// The zone a record-set change targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Opaque zone identifier
    pub id: String,
    /// Zone name, e.g. "example.com."
    pub name: String,
}

impl Zone {
    /// Create a zone reference
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
