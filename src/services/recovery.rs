//! Job recovery
//!
//! Run once when the consuming session becomes ready: if the backend already
//! has a job in flight (page reload, process restart), re-attach a tracker to
//! it. Recovery is best effort — a failed check is indistinguishable from
//! "nothing to recover" by design.

use tracing::{debug, info};

use crate::services::api_client::JobStore;
use crate::services::tracker::{JobTracker, TrackedJob};
use crate::types::ImportJobStatus;

/// Find at most one job that is still in flight: `processing` first, then
/// `pending`. Returns the seed a tracker can attach to.
pub async fn recover_active_job(store: &dyn JobStore) -> Option<TrackedJob> {
    for status in [ImportJobStatus::Processing, ImportJobStatus::Pending] {
        match store.find_job_by_status(status).await {
            Ok(Some(job)) => {
                info!("Recovered active import job {} ({})", job.id, status.as_str());
                return Some(TrackedJob::from_snapshot(&job));
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Job recovery check failed: {:#}", e);
                return None;
            }
        }
    }
    None
}

/// Recovery entry point for application startup: attaches the tracker to an
/// in-flight job unless one is already being tracked. Returns whether a job
/// was attached.
pub async fn attach_if_active(tracker: &JobTracker, store: &dyn JobStore) -> bool {
    if tracker.is_active() {
        return false;
    }
    match recover_active_job(store).await {
        Some(job) => {
            tracker.start(job);
            true
        }
        None => false,
    }
}
