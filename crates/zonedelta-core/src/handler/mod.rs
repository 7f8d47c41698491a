//! Record-set change processor
//!
//! The [`ChangeHandler`] drives one pending record-set change to a terminal
//! status against the zone's authoritative DNS backend:
//!
//! ```text
//!   START ──► [bypass?] ──yes──► APPLY ──────────► PERSIST
//!      │                                              ▲
//!      no                                             │
//!      ▼                                              │
//!   VALIDATE ──failure─────────────────────────────►──┤
//!      │    └─already applied──────────────────────►──┤
//!      ready                                          │
//!      ▼                                              │
//!   APPLY ──dns error (verify skipped)─────────────►──┤
//!      │                                              │
//!      ok                                             │
//!      ▼                                              │
//!   VERIFY ──complete | failed─────────────────────►──┘
//! ```
//!
//! Every anticipated failure (a DNS refusal, a validation mismatch) becomes a
//! persisted `Failed` change; `handle` only returns `Err` for infrastructure
//! faults, in which case nothing has been persisted and the change remains
//! `Pending` for redelivery.

pub mod bypass;
pub mod classify;
pub mod finalize;
pub mod verify;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::HandlerConfig;
use crate::error::Result;
use crate::model::{RecordSetChange, RecordType};
use crate::traits::{DnsConnector, Stores};

pub use classify::ProcessingStatus;
pub use verify::VerifyOutcome;

use classify::classify;
use verify::poll_until_applied;

/// Events emitted by the change handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerEvent {
    /// A change entered the processor
    ProcessingStarted {
        change_id: String,
        record_name: String,
    },

    /// Validation and verification were skipped (wildcard or NS)
    ValidationBypassed {
        change_id: String,
        record_type: RecordType,
    },

    /// The change was submitted to the DNS backend
    UpdateSubmitted { change_id: String },

    /// The change reached `Complete`
    ChangeCompleted { change_id: String },

    /// The change reached `Failed`
    ChangeFailed { change_id: String, message: String },
}

/// Drives record-set changes from `Pending` to `Complete`/`Failed`
///
/// The handler owns the repository handles for the lifetime of the process;
/// the DNS connector is passed per call, since the backend depends on the
/// zone being mutated.
///
/// ## Threading
///
/// One logical task per change. Many changes may be in flight on different
/// tasks as long as the caller never dispatches two changes for the same
/// `(zone, name, type)` key concurrently; the handler assumes exclusive
/// logical ownership of the record set for the duration of a run.
pub struct ChangeHandler {
    /// Repository handles
    stores: Stores,

    /// Verification settings
    verify: crate::config::VerifyConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<HandlerEvent>,
}

impl ChangeHandler {
    /// Create a new change handler
    ///
    /// Returns a tuple of (handler, event_receiver) where event_receiver
    /// yields handler events.
    pub fn new(
        stores: Stores,
        config: HandlerConfig,
    ) -> Result<(Self, mpsc::Receiver<HandlerEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let handler = Self {
            stores,
            verify: config.verify,
            event_tx: tx,
        };

        Ok((handler, rx))
    }

    /// Drive one pending change to its terminal status
    ///
    /// Returns the change with status `Complete` or `Failed` and its outcome
    /// persisted (record-set projection, audit log, owning batch rows). DNS
    /// refusals and classification mismatches are encoded in the returned
    /// status, never raised.
    pub async fn handle(
        &self,
        connector: &dyn DnsConnector,
        change: RecordSetChange,
    ) -> Result<RecordSetChange> {
        self.emit_event(HandlerEvent::ProcessingStarted {
            change_id: change.id.clone(),
            record_name: change.record_set.name.clone(),
        });

        let decided =
            if bypass::skip_validation(&change, self.stores.record_sets.as_ref()).await? {
                self.emit_event(HandlerEvent::ValidationBypassed {
                    change_id: change.id.clone(),
                    record_type: change.record_set.record_type,
                });
                self.apply_unverified(connector, change).await?
            } else {
                self.validate_apply_verify(connector, change).await?
            };

        let decided = finalize::persist_outcome(&self.stores, decided).await?;

        match &decided.system_message {
            None => {
                info!(change_id = %decided.id, record = %decided.record_set.name, "change complete");
                self.emit_event(HandlerEvent::ChangeCompleted {
                    change_id: decided.id.clone(),
                });
            }
            Some(message) => {
                info!(
                    change_id = %decided.id,
                    record = %decided.record_set.name,
                    %message,
                    "change failed"
                );
                self.emit_event(HandlerEvent::ChangeFailed {
                    change_id: decided.id.clone(),
                    message: message.clone(),
                });
            }
        }

        Ok(decided)
    }

    /// Full pipeline: classify, apply, then verify the effect
    async fn validate_apply_verify(
        &self,
        connector: &dyn DnsConnector,
        change: RecordSetChange,
    ) -> Result<RecordSetChange> {
        match classify(connector, &change).await? {
            ProcessingStatus::Failure(message) => Ok(change.failed(message)),
            ProcessingStatus::AlreadyApplied => Ok(change.successful()),
            ProcessingStatus::ReadyToApply => {
                let change = match self.apply(connector, change).await? {
                    Ok(change) => change,
                    Err(failed) => return Ok(failed),
                };
                match poll_until_applied(connector, &change, &self.verify).await? {
                    VerifyOutcome::Complete => Ok(change.successful()),
                    VerifyOutcome::Failed(message) => Ok(change.failed(message)),
                }
            }
        }
    }

    /// Bypass pipeline: apply with the DNS-level result alone deciding
    async fn apply_unverified(
        &self,
        connector: &dyn DnsConnector,
        change: RecordSetChange,
    ) -> Result<RecordSetChange> {
        match self.apply(connector, change).await? {
            Ok(change) => Ok(change.successful()),
            Err(failed) => Ok(failed),
        }
    }

    /// Submit the update; `Err` carries the change already marked failed
    async fn apply(
        &self,
        connector: &dyn DnsConnector,
        change: RecordSetChange,
    ) -> Result<std::result::Result<RecordSetChange, RecordSetChange>> {
        self.emit_event(HandlerEvent::UpdateSubmitted {
            change_id: change.id.clone(),
        });

        match connector.dns_update(&change).await? {
            Ok(_) => Ok(Ok(change)),
            Err(dns_error) => {
                let message = format!(
                    "Failed applying update to DNS for change {}:{}: {}",
                    change.id, change.record_set.name, dns_error
                );
                Ok(Err(change.failed(message)))
            }
        }
    }

    /// Emit a handler event
    fn emit_event(&self, event: HandlerEvent) {
        // Observers must never slow a change down; when the channel is full
        // the event is dropped with a warning.
        if self.event_tx.try_send(event).is_err() {
            warn!("handler event channel full, dropping event");
        }
    }
}
