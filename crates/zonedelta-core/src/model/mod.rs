//! Data model for record-set changes
//!
//! - [`RecordSet`]/[`RData`]: a (name, type) pair's records in a zone
//! - [`RecordSetChange`]/[`ChangeSet`]: one pending mutation and its journal atom
//! - [`BatchChange`]/[`SingleChange`]: the user-facing batch rows a mutation fulfills
//! - [`Zone`]: the zone a change targets

pub mod batch;
pub mod change;
pub mod record;
pub mod zone;

pub use batch::{BatchChange, SingleChange, SingleChangeStatus};
pub use change::{ChangeSet, ChangeSetStatus, ChangeType, RecordSetChange, RecordSetChangeStatus};
pub use record::{canonical_name, same_records, RData, RecordSet, RecordSetStatus, RecordType};
pub use zone::Zone;
