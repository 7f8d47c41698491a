// # Repository Traits
//
// Persistence capabilities consumed by the change processor. All writes are
// assumed idempotent by key: re-running a handler after a crash between two
// writes re-derives the same terminal state and overwrites harmlessly.
//
// Repository failures are infrastructure errors (`Err(Error)`); they unwind
// to the caller rather than producing a `Failed` change.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{BatchChange, ChangeSet, RecordSet, RecordType};

/// Authoritative projection of record sets
#[async_trait]
pub trait RecordSetRepository: Send + Sync {
    /// Fold a decided change set into the record-set projection
    async fn apply(&self, change_set: &ChangeSet) -> Result<ChangeSet>;

    /// Fetch stored record sets by `(zone, name, type)`
    ///
    /// Name comparison is case-insensitive with trailing-dot canonicalization.
    async fn get_record_sets(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<RecordSet>>;
}

/// Audit log of record-set mutations
#[async_trait]
pub trait RecordChangeRepository: Send + Sync {
    /// Record a decided change set in the audit log
    async fn save(&self, change_set: &ChangeSet) -> Result<ChangeSet>;
}

/// Store of user-submitted batch changes
#[async_trait]
pub trait BatchChangeRepository: Send + Sync {
    /// Load a batch by its own id
    async fn get_batch_change(&self, batch_id: &str) -> Result<Option<BatchChange>>;

    /// Load the batch owning a given sub-change id
    async fn get_batch_for_single_change(
        &self,
        single_change_id: &str,
    ) -> Result<Option<BatchChange>>;

    /// Persist a whole batch (read-modify-write)
    async fn save(&self, batch: &BatchChange) -> Result<BatchChange>;
}

/// The bundle of repository handles a processor runs against
#[derive(Clone)]
pub struct Stores {
    pub record_sets: Arc<dyn RecordSetRepository>,
    pub record_changes: Arc<dyn RecordChangeRepository>,
    pub batch_changes: Arc<dyn BatchChangeRepository>,
}

/// Helper trait for constructing store bundles from configuration
pub trait StoreFactory: Send + Sync {
    /// Create a store bundle from configuration
    fn create(&self, config: &serde_json::Value) -> Result<Stores>;
}
