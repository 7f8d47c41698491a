// # Record-set changes and change sets
//
// A `RecordSetChange` is one pending intention against a zone: create,
// update, or delete a record set. It enters the processor `Pending` and
// leaves exactly once, `Complete` or `Failed`; the `successful`/`failed`
// helpers are the only two places terminal status edits happen.
//
// A `ChangeSet` is the persisted journal atom wrapping changes for the
// repositories. The processor always persists a singleton change set with
// status `Complete`: success and failure are both "complete" at the
// change-set level, the per-change status carries the distinction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::record::{RecordSet, RecordSetStatus};
use crate::model::zone::Zone;

/// Kind of mutation requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
}

/// Lifecycle status of a record-set change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSetChangeStatus {
    /// Queued, not yet decided
    Pending,
    /// Applied and (where applicable) verified against DNS
    Complete,
    /// Terminally failed; `system_message` carries the cause
    Failed,
}

/// One pending record-set mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSetChange {
    /// Opaque change identifier
    pub id: String,

    /// Zone the change targets
    pub zone: Zone,

    /// Kind of mutation
    pub change_type: ChangeType,

    /// Desired post-state (create/update) or the set to delete
    pub record_set: RecordSet,

    /// For updates, the record set as currently believed to exist
    #[serde(default)]
    pub updates: Option<RecordSet>,

    /// Lifecycle status
    pub status: RecordSetChangeStatus,

    /// Human-readable failure cause, set only on failure
    #[serde(default)]
    pub system_message: Option<String>,

    /// Batch sub-change ids this record-set change fulfills
    #[serde(default)]
    pub single_batch_change_ids: Vec<String>,
}

impl RecordSetChange {
    /// Mark this change terminally successful
    ///
    /// The record set goes `Active`, the change goes `Complete`, and any
    /// stale failure message is cleared.
    pub fn successful(mut self) -> Self {
        self.record_set.status = RecordSetStatus::Active;
        self.status = RecordSetChangeStatus::Complete;
        self.system_message = None;
        self
    }

    /// Mark this change terminally failed with a cause
    pub fn failed(mut self, message: impl Into<String>) -> Self {
        self.record_set.status = RecordSetStatus::Inactive;
        self.status = RecordSetChangeStatus::Failed;
        self.system_message = Some(message.into());
        self
    }

    /// Whether the change reached `Complete`
    pub fn is_complete(&self) -> bool {
        self.status == RecordSetChangeStatus::Complete
    }
}

/// Status of a persisted change set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSetStatus {
    Pending,
    Applied,
    Complete,
}

/// Journal atom wrapping one or more record-set changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Identifier of the zone all wrapped changes target
    pub zone_id: String,

    /// Change-set status
    pub status: ChangeSetStatus,

    /// Wrapped changes, ordered
    pub changes: Vec<RecordSetChange>,

    /// When this change set was produced
    pub created_timestamp: DateTime<Utc>,
}

impl ChangeSet {
    /// Wrap a single decided change in a `Complete` change set
    pub fn complete(change: RecordSetChange) -> Self {
        Self {
            zone_id: change.zone.id.clone(),
            status: ChangeSetStatus::Complete,
            changes: vec![change],
            created_timestamp: Utc::now(),
        }
    }
}
