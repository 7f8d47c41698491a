//! Batch changes and their sub-change rows
//!
//! Users submit record edits in batches. Each row (a [`SingleChange`]) is one
//! desired RDATA add or delete; many rows may be serviced by one record-set
//! change. When a record-set change terminates, only the rows it owns (those
//! listed in its `single_batch_change_ids`) are patched; every other row in
//! the same batch must survive the round trip with identical field values.

use serde::{Deserialize, Serialize};

use crate::model::change::RecordSetChange;
use crate::model::record::{RData, RecordType};

/// Status of one batch row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleChangeStatus {
    Pending,
    Complete,
    Failed,
}

/// One row of a user-submitted batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleChange {
    /// Opaque sub-change identifier
    pub id: String,

    /// Target zone id and name
    pub zone_id: String,
    pub zone_name: String,

    /// Record name as submitted, and its fully qualified form
    pub record_name: String,
    pub fqdn: String,

    /// Record type of the desired edit
    pub record_type: RecordType,

    /// Requested TTL; absent on delete rows
    #[serde(default)]
    pub ttl: Option<u32>,

    /// Requested RDATA; absent on delete rows
    #[serde(default)]
    pub rdata: Option<RData>,

    /// Row status
    pub status: SingleChangeStatus,

    /// Id of the record-set change that serviced this row
    #[serde(default)]
    pub record_change_id: Option<String>,

    /// Id of the resulting record set, set on success
    #[serde(default)]
    pub record_set_id: Option<String>,

    /// Failure cause copied from the servicing change
    #[serde(default)]
    pub system_message: Option<String>,
}

impl SingleChange {
    /// Patch this row with the terminal outcome of its servicing change
    ///
    /// Callers are responsible for only invoking this on rows the change
    /// owns.
    pub fn apply_outcome(&mut self, change: &RecordSetChange) {
        self.record_change_id = Some(change.id.clone());
        if change.is_complete() {
            self.status = SingleChangeStatus::Complete;
            self.record_set_id = Some(change.record_set.id.clone());
        } else {
            self.status = SingleChangeStatus::Failed;
            self.system_message = change.system_message.clone();
        }
    }
}

/// A user-submitted group of sub-changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchChange {
    /// Opaque batch identifier
    pub id: String,

    /// Sub-change rows, ordered as submitted
    pub changes: Vec<SingleChange>,
}
