//! Post-apply verification against eventually-consistent DNS
//!
//! After a successful update the backend may take a while to reflect the new
//! state. The verifier re-runs the classifier with a fixed backoff between
//! attempts until it observes `AlreadyApplied`, hits a failure, or exhausts
//! its attempt budget. Attempts are strictly sequential; one resolve per
//! attempt, never more.

use tokio::time::sleep;
use tracing::debug;

use crate::config::VerifyConfig;
use crate::error::Result;
use crate::handler::classify::{classify, ProcessingStatus};
use crate::model::RecordSetChange;
use crate::traits::DnsConnector;

/// Terminal outcome of the verification loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The backend reflects the intended post-state
    Complete,
    /// Verification failed; the message becomes the system message
    Failed(String),
}

/// Poll the backend until it reflects the change's intended post-state
pub async fn poll_until_applied(
    connector: &dyn DnsConnector,
    change: &RecordSetChange,
    config: &VerifyConfig,
) -> Result<VerifyOutcome> {
    for attempt in 1..=config.max_attempts {
        match classify(connector, change).await? {
            ProcessingStatus::AlreadyApplied => {
                debug!(change_id = %change.id, attempt, "verification observed expected state");
                return Ok(VerifyOutcome::Complete);
            }
            ProcessingStatus::Failure(message) => {
                // A refusal or a conflicting answer will not self-heal; do not
                // spend the remaining attempts on it.
                return Ok(VerifyOutcome::Failed(format!(
                    "Failed verifying update for record set {} ({}): {}",
                    change.record_set.id, change.record_set.name, message
                )));
            }
            ProcessingStatus::ReadyToApply => {
                debug!(change_id = %change.id, attempt, "expected state not yet visible");
                if attempt < config.max_attempts {
                    sleep(config.backoff()).await;
                }
            }
        }
    }

    Ok(VerifyOutcome::Failed(format!(
        "Failed verifying update for record set {} ({}): \
         DNS backend did not reflect the expected state after {} attempts",
        change.record_set.id, change.record_set.name, config.max_attempts
    )))
}
