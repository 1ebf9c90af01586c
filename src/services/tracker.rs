//! Import job tracker
//!
//! Client-side state machine for one in-flight import job. After submission
//! (or recovery) it polls the backend with an adaptive interval, classifies
//! terminal states, converts the server's staleness signal into a local
//! failure, and exposes a simplified view of the job through a watch channel.
//!
//! Scheduling is a single cooperative loop per tracked job: poll, process the
//! result, then sleep under a `tokio::select!` guarded by a
//! `CancellationToken`. A new poll is only scheduled after the previous
//! result has been processed, so requests for one job never overlap.
//! Starting a new job or stopping the tracker swaps the token under one
//! mutex, which keeps "cancel previous, schedule next" atomic — at most one
//! live loop exists per tracker at any time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::services::api_client::JobStore;
use crate::types::{ImportJob, ImportJobStatus, ImportType};

/// Shown when the server reports the job stopped making forward progress.
/// Deliberately distinct from a normal job failure.
pub const STALE_JOB_MESSAGE: &str =
    "Import stalled: the job stopped making progress and was marked as failed";

/// Fallback when a failed job carries no error detail
pub const GENERIC_FAILURE_MESSAGE: &str = "Import failed without a reported error";

const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;
const POLL_BACKOFF_STEP_MS: u64 = 5_000;
const MAX_POLL_INTERVAL_MS: u64 = 30_000;
const QUICK_PROCESS_THRESHOLD_MS: u64 = 3_000;
const QUICK_RESET_DELAY_MS: u64 = 3_000;
const MIN_RESET_DELAY_MS: u64 = 5_000;
const MAX_RESET_DELAY_MS: u64 = 10_000;

// ==========================================================================
// Polling policy
// ==========================================================================

/// Polling and reset timing policy.
///
/// The defaults mirror the backend's observed processing cadence; the
/// server-side staleness tolerance window is not represented here — staleness
/// arrives as an explicit signal on the job snapshot.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Interval while the job is making visible progress
    pub initial_interval: Duration,
    /// Added per no-progress poll
    pub interval_step: Duration,
    /// Upper bound for the backed-off interval
    pub max_interval: Duration,
    /// Jobs finishing faster than this are "quick processes"
    pub quick_process_threshold: Duration,
    /// Stay-visible window after a quick process
    pub quick_reset_delay: Duration,
    /// Lower/upper bounds for the stay-visible window of longer jobs
    pub min_reset_delay: Duration,
    pub max_reset_delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            interval_step: Duration::from_millis(POLL_BACKOFF_STEP_MS),
            max_interval: Duration::from_millis(MAX_POLL_INTERVAL_MS),
            quick_process_threshold: Duration::from_millis(QUICK_PROCESS_THRESHOLD_MS),
            quick_reset_delay: Duration::from_millis(QUICK_RESET_DELAY_MS),
            min_reset_delay: Duration::from_millis(MIN_RESET_DELAY_MS),
            max_reset_delay: Duration::from_millis(MAX_RESET_DELAY_MS),
        }
    }
}

impl PollPolicy {
    /// Next wait between polls: progress resets to the fast default, no
    /// progress widens the interval by one step up to the cap
    pub fn next_interval(&self, current: Duration, progress_changed: bool) -> Duration {
        if progress_changed {
            self.initial_interval
        } else {
            (current + self.interval_step).min(self.max_interval)
        }
    }

    pub fn is_quick(&self, elapsed: Duration) -> bool {
        elapsed < self.quick_process_threshold
    }

    /// How long the terminal result stays visible before the tracker resets
    /// to idle: fixed and short for quick jobs, half the runtime (clamped)
    /// for longer ones
    pub fn reset_delay(&self, elapsed: Duration) -> Duration {
        if self.is_quick(elapsed) {
            self.quick_reset_delay
        } else {
            (elapsed / 2).clamp(self.min_reset_delay, self.max_reset_delay)
        }
    }
}

// ==========================================================================
// Tracker state
// ==========================================================================

/// Simplified, observable view of the tracked job. Client-only, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    pub is_importing: bool,
    pub import_type: Option<ImportType>,
    pub progress: Option<u8>,
    pub error: Option<String>,
    pub job_id: Option<String>,
    pub job_status: Option<ImportJobStatus>,
    pub started_at: Option<DateTime<Utc>>,
    pub poll_interval: Duration,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            is_importing: false,
            import_type: None,
            progress: None,
            error: None,
            job_id: None,
            job_status: None,
            started_at: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl TrackerState {
    pub fn is_idle(&self) -> bool {
        !self.is_importing && self.job_id.is_none()
    }
}

/// Seed describing the job a tracker should attach to
#[derive(Debug, Clone)]
pub struct TrackedJob {
    pub job_id: String,
    pub import_type: ImportType,
    pub started_at: DateTime<Utc>,
    /// Last progress known before tracking began, so the first poll can tell
    /// change from no-change
    pub last_progress: Option<u8>,
}

impl TrackedJob {
    /// Seed for a job we just submitted ourselves
    pub fn from_submission(job_id: String, import_type: ImportType) -> Self {
        Self {
            job_id,
            import_type,
            started_at: Utc::now(),
            last_progress: None,
        }
    }

    /// Seed for a job discovered on the backend (recovery path)
    pub fn from_snapshot(job: &ImportJob) -> Self {
        Self {
            job_id: job.id.clone(),
            import_type: job.import_type,
            started_at: job.effective_started_at(),
            last_progress: job.progress,
        }
    }
}

/// One-shot summary emitted when the tracked job reaches a terminal state
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerNotice {
    Completed {
        summary: String,
        /// Finished under the quick-process threshold; incremental progress
        /// was not worth showing
        quick: bool,
    },
    Failed {
        message: String,
        quick: bool,
    },
}

// ==========================================================================
// JobTracker
// ==========================================================================

/// Tracks at most one import job at a time
pub struct JobTracker {
    store: Arc<dyn JobStore>,
    policy: PollPolicy,
    state_tx: Arc<watch::Sender<TrackerState>>,
    state_rx: watch::Receiver<TrackerState>,
    notice_tx: mpsc::UnboundedSender<TrackerNotice>,
    notice_rx: Mutex<Option<mpsc::UnboundedReceiver<TrackerNotice>>>,
    active: Mutex<Option<CancellationToken>>,
}

impl JobTracker {
    pub fn new(store: Arc<dyn JobStore>, policy: PollPolicy) -> Self {
        let (state_tx, state_rx) = watch::channel(TrackerState::default());
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        Self {
            store,
            policy,
            state_tx: Arc::new(state_tx),
            state_rx,
            notice_tx,
            notice_rx: Mutex::new(Some(notice_rx)),
            active: Mutex::new(None),
        }
    }

    /// Current simplified state
    pub fn state(&self) -> TrackerState {
        self.state_rx.borrow().clone()
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.state_rx.clone()
    }

    /// Take the terminal-summary channel. Yields `Some` once; there is one
    /// consumer per tracker.
    pub fn notices(&self) -> Option<mpsc::UnboundedReceiver<TrackerNotice>> {
        self.notice_rx.lock().take()
    }

    /// Whether a job is being tracked right now. A terminal job still inside
    /// its stay-visible window counts as active.
    pub fn is_active(&self) -> bool {
        !self.state().is_idle()
    }

    /// Attach to `job` and begin polling. The first status check fires
    /// immediately so quick failures surface fast. Any previously tracked
    /// job is cancelled first.
    pub fn start(&self, job: TrackedJob) {
        let cancel = CancellationToken::new();
        {
            let mut active = self.active.lock();
            if let Some(previous) = active.replace(cancel.clone()) {
                previous.cancel();
            }
        }

        self.state_tx.send_replace(TrackerState {
            is_importing: true,
            import_type: Some(job.import_type),
            progress: job.last_progress,
            error: None,
            job_id: Some(job.job_id.clone()),
            job_status: None,
            started_at: Some(job.started_at),
            poll_interval: self.policy.initial_interval,
        });

        info!("Tracking import job {} ({})", job.job_id, job.import_type);

        let store = Arc::clone(&self.store);
        let policy = self.policy.clone();
        let state_tx = Arc::clone(&self.state_tx);
        let notice_tx = self.notice_tx.clone();
        tokio::spawn(poll_loop(store, policy, state_tx, notice_tx, cancel, job));
    }

    /// Stop tracking and reset to idle immediately (user dismissal or
    /// sign-out). Safe to call when already idle.
    pub fn stop(&self) {
        if let Some(cancel) = self.active.lock().take() {
            cancel.cancel();
        }
        self.state_tx.send_replace(TrackerState::default());
    }
}

// ==========================================================================
// Poll loop
// ==========================================================================

async fn poll_loop(
    store: Arc<dyn JobStore>,
    policy: PollPolicy,
    state_tx: Arc<watch::Sender<TrackerState>>,
    notice_tx: mpsc::UnboundedSender<TrackerNotice>,
    cancel: CancellationToken,
    job: TrackedJob,
) {
    let mut interval = policy.initial_interval;
    let mut last_progress = job.last_progress;

    loop {
        let snapshot = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = store.fetch_job(&job.job_id) => result,
        };
        // A stop that raced the fetch wins; never touch state after it
        if cancel.is_cancelled() {
            return;
        }

        match snapshot {
            Err(e) => {
                // Transient poll failure: the loop self-heals, keep going
                warn!("Status check for job {} failed: {:#}", job.job_id, e);
            }
            Ok(snap) => {
                if snap.is_stale() {
                    finish_stale(&policy, &state_tx, &notice_tx, &cancel, &job).await;
                    return;
                }

                if snap.status.is_terminal() {
                    finish_terminal(&policy, &state_tx, &notice_tx, &cancel, &job, &snap).await;
                    return;
                }

                let progress_changed = snap.progress != last_progress;
                last_progress = snap.progress;
                interval = policy.next_interval(interval, progress_changed);

                state_tx.send_modify(|state| {
                    state.progress = snap.progress;
                    state.job_status = Some(snap.status);
                    state.poll_interval = interval;
                });
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Server says the job stopped making forward progress: definitive local
/// failure, no further polls
async fn finish_stale(
    policy: &PollPolicy,
    state_tx: &watch::Sender<TrackerState>,
    notice_tx: &mpsc::UnboundedSender<TrackerNotice>,
    cancel: &CancellationToken,
    job: &TrackedJob,
) {
    warn!("Import job {} reported stale, marking as failed", job.job_id);

    let elapsed = elapsed_since(job.started_at);
    state_tx.send_modify(|state| {
        state.is_importing = false;
        state.job_status = Some(ImportJobStatus::Failed);
        state.error = Some(STALE_JOB_MESSAGE.to_string());
    });
    let _ = notice_tx.send(TrackerNotice::Failed {
        message: STALE_JOB_MESSAGE.to_string(),
        quick: policy.is_quick(elapsed),
    });

    reset_after(policy.reset_delay(elapsed), state_tx, cancel).await;
}

async fn finish_terminal(
    policy: &PollPolicy,
    state_tx: &watch::Sender<TrackerState>,
    notice_tx: &mpsc::UnboundedSender<TrackerNotice>,
    cancel: &CancellationToken,
    job: &TrackedJob,
    snap: &ImportJob,
) {
    let elapsed = elapsed_since(job.started_at);
    let quick = policy.is_quick(elapsed);

    let notice = match snap.status {
        ImportJobStatus::Completed => {
            let summary = completion_summary(snap);
            info!("Import job {} completed: {}", job.job_id, summary);
            if !snap.warnings.is_empty() {
                info!("Import job {} finished with {} warnings", job.job_id, snap.warnings.len());
            }
            state_tx.send_modify(|state| {
                state.is_importing = false;
                state.progress = snap.progress;
                state.job_status = Some(ImportJobStatus::Completed);
            });
            TrackerNotice::Completed { summary, quick }
        }
        _ => {
            let message = snap
                .errors
                .first()
                .cloned()
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            warn!("Import job {} failed: {}", job.job_id, message);
            state_tx.send_modify(|state| {
                state.is_importing = false;
                state.job_status = Some(ImportJobStatus::Failed);
                state.error = Some(message.clone());
            });
            TrackerNotice::Failed { message, quick }
        }
    };
    let _ = notice_tx.send(notice);

    reset_after(policy.reset_delay(elapsed), state_tx, cancel).await;
}

/// Keep the terminal result visible for `delay`, then return to idle. An
/// explicit stop during the window wins and performs the reset itself.
async fn reset_after(
    delay: Duration,
    state_tx: &watch::Sender<TrackerState>,
    cancel: &CancellationToken,
) {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(delay) => {}
    }
    state_tx.send_replace(TrackerState::default());
}

fn completion_summary(job: &ImportJob) -> String {
    let mut summary = format!("{} created, {} updated", job.created, job.updated);
    if job.failed > 0 {
        summary.push_str(&format!(", {} failed", job.failed));
    }
    summary
}

fn elapsed_since(started_at: DateTime<Utc>) -> Duration {
    (Utc::now() - started_at).to_std().unwrap_or_default()
}

// ==========================================================================
// Tests
// ==========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn snapshot(status: ImportJobStatus, progress: Option<u8>) -> ImportJob {
        ImportJob {
            id: "job-1".to_string(),
            import_type: ImportType::Products,
            status,
            progress,
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            errors: vec![],
            warnings: vec![],
            original_file_name: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            runtime: None,
        }
    }

    /// Store that replays a fixed sequence of snapshots, then errors
    struct ScriptedStore {
        snapshots: Mutex<VecDeque<ImportJob>>,
        calls: AtomicUsize,
    }

    impl ScriptedStore {
        fn new(snapshots: Vec<ImportJob>) -> Arc<Self> {
            Arc::new(Self {
                snapshots: Mutex::new(snapshots.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobStore for ScriptedStore {
        async fn fetch_job(&self, _job_id: &str) -> Result<ImportJob> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.snapshots
                .lock()
                .pop_front()
                .ok_or_else(|| anyhow!("script exhausted"))
        }

        async fn find_job_by_status(&self, _status: ImportJobStatus) -> Result<Option<ImportJob>> {
            Ok(None)
        }
    }

    /// Store that answers `processing` forever, counting calls per job id
    struct EndlessStore {
        per_job: Mutex<HashMap<String, usize>>,
    }

    impl EndlessStore {
        fn new() -> Arc<Self> {
            Arc::new(Self { per_job: Mutex::new(HashMap::new()) })
        }

        fn calls_for(&self, job_id: &str) -> usize {
            self.per_job.lock().get(job_id).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl JobStore for EndlessStore {
        async fn fetch_job(&self, job_id: &str) -> Result<ImportJob> {
            *self.per_job.lock().entry(job_id.to_string()).or_insert(0) += 1;
            let mut job = snapshot(ImportJobStatus::Processing, Some(10));
            job.id = job_id.to_string();
            Ok(job)
        }

        async fn find_job_by_status(&self, _status: ImportJobStatus) -> Result<Option<ImportJob>> {
            Ok(None)
        }
    }

    fn seed(job_id: &str) -> TrackedJob {
        TrackedJob::from_submission(job_id.to_string(), ImportType::Products)
    }

    async fn wait_until(mut check: impl FnMut() -> bool) {
        while !check() {
            tokio::time::sleep(ms(10)).await;
        }
    }

    // ── polling policy ──────────────────────────────────────────────────

    #[test]
    fn test_backoff_widens_by_step_and_caps() {
        let policy = PollPolicy::default();
        let mut interval = policy.initial_interval;
        let expected = [15_000, 20_000, 25_000, 30_000, 30_000, 30_000];

        for expect in expected {
            interval = policy.next_interval(interval, false);
            assert_eq!(interval, ms(expect));
        }
    }

    #[test]
    fn test_progress_resets_interval_to_default() {
        let policy = PollPolicy::default();
        assert_eq!(policy.next_interval(ms(30_000), true), ms(10_000));
        assert_eq!(policy.next_interval(ms(10_000), true), ms(10_000));
    }

    #[test]
    fn test_reset_delay_quick_and_clamped() {
        let policy = PollPolicy::default();
        // Quick process: fixed short window
        assert_eq!(policy.reset_delay(ms(1_000)), ms(3_000));
        // elapsed/2 below the floor clamps up
        assert_eq!(policy.reset_delay(ms(4_000)), ms(5_000));
        // Inside the band: exactly half the runtime
        assert_eq!(policy.reset_delay(ms(16_000)), ms(8_000));
        // Above the band clamps down
        assert_eq!(policy.reset_delay(ms(60_000)), ms(10_000));
    }

    // ── scenario: happy path ────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_emits_summary_and_resets() {
        let mut completed = snapshot(ImportJobStatus::Completed, Some(100));
        completed.created = 5;
        completed.updated = 2;

        let store = ScriptedStore::new(vec![
            snapshot(ImportJobStatus::Processing, Some(10)),
            snapshot(ImportJobStatus::Processing, Some(10)),
            completed,
        ]);
        let tracker = JobTracker::new(store.clone(), PollPolicy::default());
        let mut notices = tracker.notices().unwrap();

        tracker.start(seed("job-1"));

        let notice = notices.recv().await.unwrap();
        match notice {
            TrackerNotice::Completed { summary, .. } => {
                assert!(summary.contains('5'), "summary was: {}", summary);
                assert!(summary.contains('2'), "summary was: {}", summary);
                assert!(!summary.contains("failed"));
            }
            other => panic!("expected completion, got {:?}", other),
        }
        // Terminal state reached after exactly three status checks
        assert_eq!(store.calls(), 3);

        wait_until(|| tracker.state().is_idle()).await;
        assert_eq!(tracker.state(), TrackerState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_summary_mentions_failed_rows() {
        let mut completed = snapshot(ImportJobStatus::Completed, Some(100));
        completed.created = 3;
        completed.updated = 0;
        completed.failed = 4;

        let store = ScriptedStore::new(vec![completed]);
        let tracker = JobTracker::new(store, PollPolicy::default());
        let mut notices = tracker.notices().unwrap();

        tracker.start(seed("job-1"));

        match notices.recv().await.unwrap() {
            TrackerNotice::Completed { summary, .. } => assert!(summary.contains("4 failed")),
            other => panic!("expected completion, got {:?}", other),
        }
    }

    // ── scenario: stale detection ───────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_stale_job_fails_locally_without_further_polls() {
        let mut stale = snapshot(ImportJobStatus::Processing, Some(40));
        stale.runtime = Some(crate::types::JobRuntime { is_stale: true });

        let store = ScriptedStore::new(vec![stale]);
        let tracker = JobTracker::new(store.clone(), PollPolicy::default());
        let mut notices = tracker.notices().unwrap();

        tracker.start(seed("job-1"));

        match notices.recv().await.unwrap() {
            TrackerNotice::Failed { message, .. } => assert_eq!(message, STALE_JOB_MESSAGE),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(store.calls(), 1);

        wait_until(|| tracker.state().is_idle()).await;
        assert_eq!(store.calls(), 1, "stale job must not be polled again");
    }

    // ── scenario: server-side failure ───────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_surfaces_first_error() {
        let mut failed = snapshot(ImportJobStatus::Failed, None);
        failed.errors = vec!["row 3: duplicate SKU".to_string(), "row 9: bad price".to_string()];

        let store = ScriptedStore::new(vec![failed]);
        let tracker = JobTracker::new(store, PollPolicy::default());
        let mut notices = tracker.notices().unwrap();

        tracker.start(seed("job-1"));

        match notices.recv().await.unwrap() {
            TrackerNotice::Failed { message, .. } => assert_eq!(message, "row 3: duplicate SKU"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_without_errors_uses_generic_message() {
        let store = ScriptedStore::new(vec![snapshot(ImportJobStatus::Failed, None)]);
        let tracker = JobTracker::new(store, PollPolicy::default());
        let mut notices = tracker.notices().unwrap();

        tracker.start(seed("job-1"));

        match notices.recv().await.unwrap() {
            TrackerNotice::Failed { message, .. } => assert_eq!(message, GENERIC_FAILURE_MESSAGE),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    // ── transient errors ────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_transient_poll_error_does_not_stop_the_loop() {
        // One good snapshot, every later call errors (script exhausted)
        let store = ScriptedStore::new(vec![snapshot(ImportJobStatus::Processing, Some(10))]);
        let tracker = JobTracker::new(store.clone(), PollPolicy::default());

        tracker.start(seed("job-1"));

        // First call succeeds, subsequent calls error; the loop must survive
        // them and keep scheduling checks
        wait_until(|| store.calls() >= 3).await;
        assert!(tracker.state().is_importing);

        tracker.stop();
    }

    // ── lifecycle invariants ────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_starting_a_new_job_cancels_the_previous_loop() {
        let store = EndlessStore::new();
        let tracker = JobTracker::new(store.clone(), PollPolicy::default());

        tracker.start(seed("job-a"));
        wait_until(|| store.calls_for("job-a") >= 1).await;

        tracker.start(seed("job-b"));
        let calls_a = store.calls_for("job-a");
        wait_until(|| store.calls_for("job-b") >= 3).await;

        // The first loop stopped when the second started; one extra in-flight
        // check may land, nothing more
        assert!(store.calls_for("job-a") <= calls_a + 1);
        assert_eq!(tracker.state().job_id.as_deref(), Some("job-b"));

        tracker.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_resets_to_idle_and_is_idempotent() {
        let store = EndlessStore::new();
        let tracker = JobTracker::new(store.clone(), PollPolicy::default());

        tracker.start(seed("job-a"));
        wait_until(|| store.calls_for("job-a") >= 1).await;

        tracker.stop();
        assert!(tracker.state().is_idle());
        let calls_after_stop = store.calls_for("job-a");

        // Second stop is a no-op, no error, no state change
        tracker.stop();
        assert_eq!(tracker.state(), TrackerState::default());

        tokio::time::sleep(ms(120_000)).await;
        assert!(store.calls_for("job-a") <= calls_after_stop + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_seeds_state_from_tracked_job() {
        let store = EndlessStore::new();
        let tracker = JobTracker::new(store, PollPolicy::default());

        let mut job = seed("job-a");
        job.last_progress = Some(25);
        tracker.start(job);

        let state = tracker.state();
        assert!(state.is_importing);
        assert_eq!(state.job_id.as_deref(), Some("job-a"));
        assert_eq!(state.progress, Some(25));
        assert_eq!(state.import_type, Some(ImportType::Products));
        assert_eq!(state.poll_interval, ms(10_000));

        tracker.stop();
    }

    #[test]
    fn test_tracked_job_from_snapshot_uses_created_at_fallback() {
        let job = snapshot(ImportJobStatus::Processing, Some(60));
        let tracked = TrackedJob::from_snapshot(&job);

        assert_eq!(tracked.started_at, job.created_at);
        assert_eq!(tracked.last_progress, Some(60));
    }

    #[test]
    fn test_completion_summary_format() {
        let mut job = snapshot(ImportJobStatus::Completed, Some(100));
        job.created = 12;
        job.updated = 7;
        assert_eq!(completion_summary(&job), "12 created, 7 updated");

        job.failed = 2;
        assert_eq!(completion_summary(&job), "12 created, 7 updated, 2 failed");
    }
}
