// # Memory Store
//
// In-memory implementation of all three repository capabilities.
//
// ## Crash Behavior
//
// - All state is lost on restart/crash
// - The record-set projection is rebuilt from DNS by later changes (the
//   classifier re-derives against the live zone, so a lost projection heals)
// - The audit log and batch rows are gone for good; use a durable store
//   where that matters
//
// ## When to Use
//
// - Testing environments
// - Single-shot worker runs where the upstream system of record is durable

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::model::record::canonical_name;
use crate::model::{
    BatchChange, ChangeSet, ChangeType, RecordSet, RecordSetChange, RecordSetChangeStatus,
    RecordType,
};
use crate::traits::{
    BatchChangeRepository, RecordChangeRepository, RecordSetRepository, StoreFactory, Stores,
};

/// In-memory store implementing every repository capability
///
/// State lives in `HashMap`s behind `RwLock`s; clones share the same maps, so
/// one `MemoryStore` can serve as all three repository handles at once.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Record-set projection, keyed by record-set id
    record_sets: Arc<RwLock<HashMap<String, RecordSet>>>,

    /// Audit log, keyed by change id
    changes: Arc<RwLock<HashMap<String, RecordSetChange>>>,

    /// Batch changes, keyed by batch id
    batches: Arc<RwLock<HashMap<String, BatchChange>>>,

    /// Reverse index: sub-change id to owning batch id
    batch_index: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle this store as all three repository handles
    pub fn stores(&self) -> Stores {
        Stores {
            record_sets: Arc::new(self.clone()),
            record_changes: Arc::new(self.clone()),
            batch_changes: Arc::new(self.clone()),
        }
    }

    /// Seed a record set directly into the projection
    pub async fn put_record_set(&self, record_set: RecordSet) {
        let mut guard = self.record_sets.write().await;
        guard.insert(record_set.id.clone(), record_set);
    }

    /// Number of record sets in the projection
    pub async fn record_set_count(&self) -> usize {
        self.record_sets.read().await.len()
    }

    /// Look up an audit-log entry by change id
    pub async fn get_change(&self, change_id: &str) -> Option<RecordSetChange> {
        self.changes.read().await.get(change_id).cloned()
    }

    /// Clear all state
    pub async fn clear(&self) {
        self.record_sets.write().await.clear();
        self.changes.write().await.clear();
        self.batches.write().await.clear();
        self.batch_index.write().await.clear();
    }
}

#[async_trait]
impl RecordSetRepository for MemoryStore {
    async fn apply(&self, change_set: &ChangeSet) -> Result<ChangeSet> {
        let mut guard = self.record_sets.write().await;
        for change in &change_set.changes {
            let deleted = change.change_type == ChangeType::Delete
                && change.status == RecordSetChangeStatus::Complete;
            if deleted {
                guard.remove(&change.record_set.id);
            } else {
                guard.insert(change.record_set.id.clone(), change.record_set.clone());
            }
        }
        Ok(change_set.clone())
    }

    async fn get_record_sets(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<RecordSet>> {
        let wanted = canonical_name(name);
        let guard = self.record_sets.read().await;
        Ok(guard
            .values()
            .filter(|rs| {
                rs.zone_id == zone_id
                    && rs.record_type == record_type
                    && canonical_name(&rs.name) == wanted
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecordChangeRepository for MemoryStore {
    async fn save(&self, change_set: &ChangeSet) -> Result<ChangeSet> {
        let mut guard = self.changes.write().await;
        for change in &change_set.changes {
            guard.insert(change.id.clone(), change.clone());
        }
        Ok(change_set.clone())
    }
}

#[async_trait]
impl BatchChangeRepository for MemoryStore {
    async fn get_batch_change(&self, batch_id: &str) -> Result<Option<BatchChange>> {
        Ok(self.batches.read().await.get(batch_id).cloned())
    }

    async fn get_batch_for_single_change(
        &self,
        single_change_id: &str,
    ) -> Result<Option<BatchChange>> {
        let batch_id = match self.batch_index.read().await.get(single_change_id) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        self.get_batch_change(&batch_id).await
    }

    async fn save(&self, batch: &BatchChange) -> Result<BatchChange> {
        let mut index = self.batch_index.write().await;
        for single_change in &batch.changes {
            index.insert(single_change.id.clone(), batch.id.clone());
        }
        drop(index);

        let mut guard = self.batches.write().await;
        guard.insert(batch.id.clone(), batch.clone());
        Ok(batch.clone())
    }
}

/// Factory for the in-memory store bundle
pub struct MemoryStoreFactory;

impl StoreFactory for MemoryStoreFactory {
    fn create(&self, config: &serde_json::Value) -> Result<Stores> {
        // The memory store takes no parameters beyond its own tag.
        match config.get("type").and_then(|t| t.as_str()) {
            Some("memory") | None => Ok(MemoryStore::new().stores()),
            Some(other) => Err(Error::config(format!(
                "invalid config for memory store: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RData, RecordSetStatus, SingleChange, SingleChangeStatus, Zone};

    fn record_set(id: &str, name: &str) -> RecordSet {
        RecordSet::new(
            id,
            "zone-1",
            name,
            RecordType::A,
            300,
            vec![RData::A {
                address: "192.0.2.1".parse().unwrap(),
            }],
        )
    }

    fn change(change_type: ChangeType, status: RecordSetChangeStatus) -> RecordSetChange {
        RecordSetChange {
            id: "change-1".to_string(),
            zone: Zone::new("zone-1", "example.com."),
            change_type,
            record_set: record_set("rs-1", "host.example.com."),
            updates: None,
            status,
            system_message: None,
            single_batch_change_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_apply_upserts_and_deletes() {
        let store = MemoryStore::new();

        let create = ChangeSet::complete(
            change(ChangeType::Create, RecordSetChangeStatus::Pending).successful(),
        );
        store.apply(&create).await.unwrap();
        assert_eq!(store.record_set_count().await, 1);

        let delete = ChangeSet::complete(
            change(ChangeType::Delete, RecordSetChangeStatus::Pending).successful(),
        );
        store.apply(&delete).await.unwrap();
        assert_eq!(store.record_set_count().await, 0);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_projection_entry() {
        let store = MemoryStore::new();
        store.put_record_set(record_set("rs-1", "host.example.com.")).await;

        let failed = ChangeSet::complete(
            change(ChangeType::Delete, RecordSetChangeStatus::Pending).failed("dns failure"),
        );
        store.apply(&failed).await.unwrap();

        let live = store
            .get_record_sets("zone-1", "host.example.com", RecordType::A)
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].status, RecordSetStatus::Inactive);
    }

    #[tokio::test]
    async fn test_get_record_sets_canonicalizes_names() {
        let store = MemoryStore::new();
        store.put_record_set(record_set("rs-1", "Host.Example.COM.")).await;

        let live = store
            .get_record_sets("zone-1", "host.example.com", RecordType::A)
            .await
            .unwrap();
        assert_eq!(live.len(), 1);

        let other_zone = store
            .get_record_sets("zone-2", "host.example.com", RecordType::A)
            .await
            .unwrap();
        assert!(other_zone.is_empty());
    }

    #[tokio::test]
    async fn test_batch_reverse_index() {
        let store = MemoryStore::new();
        let batch = BatchChange {
            id: "batch-1".to_string(),
            changes: vec![SingleChange {
                id: "b1".to_string(),
                zone_id: "zone-1".to_string(),
                zone_name: "example.com.".to_string(),
                record_name: "host".to_string(),
                fqdn: "host.example.com.".to_string(),
                record_type: RecordType::A,
                ttl: Some(300),
                rdata: None,
                status: SingleChangeStatus::Pending,
                record_change_id: None,
                record_set_id: None,
                system_message: None,
            }],
        };
        BatchChangeRepository::save(&store, &batch).await.unwrap();

        let found = store.get_batch_for_single_change("b1").await.unwrap();
        assert_eq!(found.map(|b| b.id), Some("batch-1".to_string()));

        let missing = store.get_batch_for_single_change("b9").await.unwrap();
        assert!(missing.is_none());
    }
}
