//! Test doubles and common utilities for handler contract tests
//!
//! The scripted connector replays canned DNS answers in order and counts
//! calls; the recording store is the in-memory store with write counters
//! layered on top. Together they support the resolver-call accounting the
//! contract tests assert on.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zonedelta_core::config::{ConnectorConfig, HandlerConfig, StoreConfig, VerifyConfig};
use zonedelta_core::error::{Error, Result};
use zonedelta_core::model::{
    BatchChange, ChangeSet, ChangeType, RData, RecordSet, RecordSetChange, RecordSetChangeStatus,
    RecordType, SingleChange, SingleChangeStatus, Zone,
};
use zonedelta_core::store::MemoryStore;
use zonedelta_core::traits::{
    BatchChangeRepository, DnsConnector, DnsResponse, DnsResult, RecordChangeRepository,
    RecordSetRepository, Stores,
};

/// A DNS connector that replays scripted answers and counts calls
///
/// Scripted results are consumed front to back; when a queue runs dry the
/// connector answers with the quiet defaults (an empty zone, an accepted
/// update), which keeps long verify loops easy to script.
pub struct ScriptedConnector {
    resolve_script: Mutex<VecDeque<Result<DnsResult<Vec<RecordSet>>>>>,
    update_script: Mutex<VecDeque<Result<DnsResult<DnsResponse>>>>,
    resolve_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self {
            resolve_script: Mutex::new(VecDeque::new()),
            update_script: Mutex::new(VecDeque::new()),
            resolve_calls: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue the next resolve answer
    pub fn push_resolve(&self, result: Result<DnsResult<Vec<RecordSet>>>) {
        self.resolve_script.lock().unwrap().push_back(result);
    }

    /// Queue the next update answer
    pub fn push_update(&self, result: Result<DnsResult<DnsResponse>>) {
        self.update_script.lock().unwrap().push_back(result);
    }

    /// Number of times dns_resolve() was called
    pub fn resolve_call_count(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    /// Number of times dns_update() was called
    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsConnector for ScriptedConnector {
    async fn dns_resolve(
        &self,
        _name: &str,
        _zone_name: &str,
        _record_type: RecordType,
    ) -> Result<DnsResult<Vec<RecordSet>>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        match self.resolve_script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(Ok(Vec::new())),
        }
    }

    async fn dns_update(&self, _change: &RecordSetChange) -> Result<DnsResult<DnsResponse>> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        match self.update_script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(Ok(DnsResponse::NoError)),
        }
    }

    fn connector_name(&self) -> &'static str {
        "scripted"
    }
}

/// The in-memory store with write counters on the repository surface
#[derive(Clone)]
pub struct RecordingStore {
    inner: MemoryStore,
    apply_calls: Arc<AtomicUsize>,
    change_saves: Arc<AtomicUsize>,
    batch_saves: Arc<AtomicUsize>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            apply_calls: Arc::new(AtomicUsize::new(0)),
            change_saves: Arc::new(AtomicUsize::new(0)),
            batch_saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Bundle this store as all three repository handles
    pub fn stores(&self) -> Stores {
        Stores {
            record_sets: Arc::new(self.clone()),
            record_changes: Arc::new(self.clone()),
            batch_changes: Arc::new(self.clone()),
        }
    }

    /// Direct access to the wrapped memory store (seeding, inspection)
    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    /// Number of times RecordSetRepository::apply() was called
    pub fn apply_call_count(&self) -> usize {
        self.apply_calls.load(Ordering::SeqCst)
    }

    /// Number of times RecordChangeRepository::save() was called
    pub fn change_save_count(&self) -> usize {
        self.change_saves.load(Ordering::SeqCst)
    }

    /// Number of times BatchChangeRepository::save() was called
    pub fn batch_save_count(&self) -> usize {
        self.batch_saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSetRepository for RecordingStore {
    async fn apply(&self, change_set: &ChangeSet) -> Result<ChangeSet> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.apply(change_set).await
    }

    async fn get_record_sets(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<RecordSet>> {
        self.inner.get_record_sets(zone_id, name, record_type).await
    }
}

#[async_trait]
impl RecordChangeRepository for RecordingStore {
    async fn save(&self, change_set: &ChangeSet) -> Result<ChangeSet> {
        self.change_saves.fetch_add(1, Ordering::SeqCst);
        RecordChangeRepository::save(&self.inner, change_set).await
    }
}

#[async_trait]
impl BatchChangeRepository for RecordingStore {
    async fn get_batch_change(&self, batch_id: &str) -> Result<Option<BatchChange>> {
        self.inner.get_batch_change(batch_id).await
    }

    async fn get_batch_for_single_change(
        &self,
        single_change_id: &str,
    ) -> Result<Option<BatchChange>> {
        self.inner.get_batch_for_single_change(single_change_id).await
    }

    async fn save(&self, batch: &BatchChange) -> Result<BatchChange> {
        self.batch_saves.fetch_add(1, Ordering::SeqCst);
        BatchChangeRepository::save(&self.inner, batch).await
    }
}

/// The AAAA record used throughout the contract scenarios
pub fn aaaa_rdata() -> RData {
    RData::Aaaa {
        address: "2001:db8::1".parse().unwrap(),
    }
}

/// The desired post-state: AAAA host.example.com. TTL 300
pub fn desired_record_set() -> RecordSet {
    RecordSet::new(
        "rs-1",
        "zone-1",
        "host.example.com.",
        RecordType::Aaaa,
        300,
        vec![aaaa_rdata()],
    )
}

/// The desired post-state as the zone's authority would answer it
pub fn live_record_set() -> RecordSet {
    RecordSet::resolved(
        "host.example.com.",
        RecordType::Aaaa,
        300,
        vec![aaaa_rdata()],
    )
}

/// A pending create for the desired record set, owning batch rows b1 and b2
pub fn pending_create() -> RecordSetChange {
    RecordSetChange {
        id: "change-1".to_string(),
        zone: Zone::new("zone-1", "example.com."),
        change_type: ChangeType::Create,
        record_set: desired_record_set(),
        updates: None,
        status: RecordSetChangeStatus::Pending,
        system_message: None,
        single_batch_change_ids: vec!["b1".to_string(), "b2".to_string()],
    }
}

/// One pending batch row
pub fn single_change(id: &str) -> SingleChange {
    SingleChange {
        id: id.to_string(),
        zone_id: "zone-1".to_string(),
        zone_name: "example.com.".to_string(),
        record_name: "host".to_string(),
        fqdn: "host.example.com.".to_string(),
        record_type: RecordType::Aaaa,
        ttl: Some(300),
        rdata: Some(aaaa_rdata()),
        status: SingleChangeStatus::Pending,
        record_change_id: None,
        record_set_id: None,
        system_message: None,
    }
}

/// A batch with rows b0 (owned by some other change), b1, and b2
pub fn seeded_batch() -> BatchChange {
    BatchChange {
        id: "batch-1".to_string(),
        changes: vec![single_change("b0"), single_change("b1"), single_change("b2")],
    }
}

/// Handler configuration for tests: scripted connector section, memory
/// store, 12 verify attempts with a 1 ms backoff
pub fn test_config() -> HandlerConfig {
    HandlerConfig {
        connector: ConnectorConfig::Custom {
            factory: "scripted".to_string(),
            config: serde_json::json!({}),
        },
        store: StoreConfig::Memory,
        verify: VerifyConfig {
            max_attempts: 12,
            backoff_ms: 1,
        },
        event_channel_capacity: 100,
    }
}

/// Shorthand for an infrastructure error on a scripted call
pub fn infra_error() -> Error {
    Error::connector("connection reset by backend")
}
