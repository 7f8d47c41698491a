//! Pre-apply classification against live DNS
//!
//! The classifier resolves the change's `(name, zone, type)` against the
//! zone's authority and decides, per change type, whether the mutation is
//! redundant, applicable, or inconsistent:
//!
//! | change  | live empty     | live == desired | live differs                      |
//! |---------|----------------|-----------------|-----------------------------------|
//! | create  | ready to apply | already applied | failure (incompatible record)     |
//! | update  | ready to apply | already applied | ready iff live == expected        |
//! |         | (drift accepted)|                | pre-image, else out-of-sync fail  |
//! | delete  | already applied| n/a             | ready to apply                    |
//!
//! A delete with drifted TTL or RDATA still classifies as ready; the verifier
//! arbitrates by polling for the empty set afterwards.

use tracing::debug;

use crate::error::Result;
use crate::model::{ChangeType, RecordSet, RecordSetChange};
use crate::traits::DnsConnector;

/// Decision for one pending change against live DNS state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingStatus {
    /// The backend does not yet reflect the change; apply it
    ReadyToApply,
    /// The backend already reflects the intended post-state; skip apply
    AlreadyApplied,
    /// The change cannot proceed; the message becomes the system message
    Failure(String),
}

/// Classify a change by resolving its record set against the zone's primary
///
/// DNS-level resolution failures classify as `Failure`; only infrastructure
/// faults propagate as `Err`.
pub async fn classify(
    connector: &dyn DnsConnector,
    change: &RecordSetChange,
) -> Result<ProcessingStatus> {
    let record_set = &change.record_set;
    let live = match connector
        .dns_resolve(&record_set.name, &change.zone.name, record_set.record_type)
        .await?
    {
        Ok(live) => live,
        Err(dns_error) => return Ok(ProcessingStatus::Failure(dns_error.to_string())),
    };

    debug!(
        change_id = %change.id,
        record = %record_set.name,
        live_count = live.len(),
        "classifying change against live DNS state"
    );

    let status = match change.change_type {
        ChangeType::Create => classify_create(record_set, &live),
        ChangeType::Update => classify_update(record_set, change.updates.as_ref(), &live),
        ChangeType::Delete => classify_delete(&live),
    };

    Ok(status)
}

fn classify_create(desired: &RecordSet, live: &[RecordSet]) -> ProcessingStatus {
    if live.is_empty() {
        ProcessingStatus::ReadyToApply
    } else if matches_exactly(live, desired) {
        ProcessingStatus::AlreadyApplied
    } else {
        ProcessingStatus::Failure(format!(
            "Incompatible record set already exists in DNS for {}; cannot create.",
            desired.name
        ))
    }
}

fn classify_update(
    desired: &RecordSet,
    expected: Option<&RecordSet>,
    live: &[RecordSet],
) -> ProcessingStatus {
    if live.is_empty() {
        // Nothing live to conflict with; accept the drift and apply.
        return ProcessingStatus::ReadyToApply;
    }
    if matches_exactly(live, desired) {
        return ProcessingStatus::AlreadyApplied;
    }
    match expected {
        Some(expected) if matches_exactly(live, expected) => ProcessingStatus::ReadyToApply,
        _ => ProcessingStatus::Failure(
            "This record set is out of sync with the DNS backend; \
             sync this zone before attempting to update this record set."
                .to_string(),
        ),
    }
}

fn classify_delete(live: &[RecordSet]) -> ProcessingStatus {
    if live.is_empty() {
        ProcessingStatus::AlreadyApplied
    } else {
        ProcessingStatus::ReadyToApply
    }
}

/// Whether the live answer is exactly one record set structurally equal to
/// `want`. Multiple live sets for one (name, type) always count as differing.
fn matches_exactly(live: &[RecordSet], want: &RecordSet) -> bool {
    match live {
        [only] => only.matches(want),
        _ => false,
    }
}
