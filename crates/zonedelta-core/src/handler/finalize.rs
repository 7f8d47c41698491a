//! Outcome persistence and batch fan-out
//!
//! Once a change reaches its terminal status the finalizer writes, in order:
//!
//! 1. the record-set projection (`RecordSetRepository::apply`),
//! 2. the audit log (`RecordChangeRepository::save`),
//! 3. the owning batch changes, patched row by row.
//!
//! Both change-set writes happen on success and failure alike; a failed
//! change is still a decided change. Any write error here is an
//! infrastructure fault and unwinds to the caller.

use std::collections::HashSet;

use tracing::warn;

use crate::error::Result;
use crate::model::{BatchChange, ChangeSet, RecordSetChange};
use crate::traits::{BatchChangeRepository, Stores};

/// Persist a decided change and fan its outcome out to the owning batches
pub async fn persist_outcome(stores: &Stores, change: RecordSetChange) -> Result<RecordSetChange> {
    let change_set = ChangeSet::complete(change.clone());

    stores.record_sets.apply(&change_set).await?;
    stores.record_changes.save(&change_set).await?;

    update_batch_changes(stores.batch_changes.as_ref(), &change).await?;

    Ok(change)
}

/// Patch the sub-changes this record-set change owns, batch by batch
///
/// Rows whose id is not in `change.single_batch_change_ids` are written back
/// exactly as read.
async fn update_batch_changes(
    repo: &dyn BatchChangeRepository,
    change: &RecordSetChange,
) -> Result<()> {
    if change.single_batch_change_ids.is_empty() {
        return Ok(());
    }

    let mut batches: Vec<BatchChange> = Vec::new();
    for single_change_id in &change.single_batch_change_ids {
        match repo.get_batch_for_single_change(single_change_id).await? {
            Some(batch) => {
                if !batches.iter().any(|b| b.id == batch.id) {
                    batches.push(batch);
                }
            }
            None => {
                // The change outlived its batch; nothing to patch for this row.
                warn!(
                    change_id = %change.id,
                    single_change_id = %single_change_id,
                    "no batch change found for sub-change"
                );
            }
        }
    }

    let owned: HashSet<&str> = change
        .single_batch_change_ids
        .iter()
        .map(String::as_str)
        .collect();

    for mut batch in batches {
        for single_change in &mut batch.changes {
            if owned.contains(single_change.id.as_str()) {
                single_change.apply_outcome(change);
            }
        }
        repo.save(&batch).await?;
    }

    Ok(())
}
