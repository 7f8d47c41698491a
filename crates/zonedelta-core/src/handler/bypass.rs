//! Wildcard / NS bypass rule
//!
//! Two classes of change cannot be validated or verified by resolving against
//! the zone's authority:
//!
//! - names covered by a wildcard: resolution returns synthesised answers that
//!   look identical before and after the mutation;
//! - NS record sets: delegation answers at a zone cut do not reflect the
//!   stored record set.
//!
//! For these the processor skips straight to apply-and-persist, letting the
//! DNS-level result of the update alone decide success.

use tracing::debug;

use crate::error::Result;
use crate::model::{canonical_name, RecordSetChange, RecordType};
use crate::traits::RecordSetRepository;

/// Whether validation and verification must be skipped for this change
pub async fn skip_validation(
    change: &RecordSetChange,
    record_sets: &dyn RecordSetRepository,
) -> Result<bool> {
    if change.record_set.record_type == RecordType::Ns {
        debug!(change_id = %change.id, "NS change, bypassing validation");
        return Ok(true);
    }

    let name = canonical_name(&change.record_set.name);
    if name.starts_with('*') {
        debug!(change_id = %change.id, record = %name, "wildcard target, bypassing validation");
        return Ok(true);
    }

    let covering = record_sets
        .get_record_sets(
            &change.record_set.zone_id,
            &wildcard_form(&name),
            change.record_set.record_type,
        )
        .await?;

    if !covering.is_empty() {
        debug!(
            change_id = %change.id,
            record = %name,
            "target covered by a stored wildcard, bypassing validation"
        );
        return Ok(true);
    }

    Ok(false)
}

/// The wildcard sibling of a name: its leftmost label replaced by `*`
fn wildcard_form(name: &str) -> String {
    match name.split_once('.') {
        Some((_, rest)) => format!("*.{}", rest),
        None => "*".to_string(),
    }
}
