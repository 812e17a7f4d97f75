//! OAuth finalization polling engine.
//!
//! After the user approves access in an external browser, two things have to
//! converge: the pending authorization must be exchanged for a server-side
//! session (`finalize`), and the application snapshot must be re-fetched
//! until it reflects that session (`refresh`). [`FinalizePoller`] drives both
//! phases on a fixed-interval tick with a bounded attempt budget:
//!
//! - while unfinalized, each tick retries `finalize`; on success it
//!   immediately tries `refresh` once;
//! - once finalized, each tick retries only `refresh` (the flag never
//!   reverts within a session);
//! - when the budget runs out, one last unconditional `refresh` is made —
//!   a session or character may have arrived even though finalize never
//!   confirmed — and the session ends as [`PollOutcome::Exhausted`].
//!
//! Ticks never overlap: the next tick is scheduled only after the current
//! tick's awaited calls resolve. A poller owns at most one live session;
//! calling [`start_poll`](FinalizePoller::start_poll) again supersedes the
//! previous session and cancels its timer. Independent pollers (login vs.
//! add-character) share no state and may run concurrently.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{FlightdeckError, Result};

/// Attempt budget and tick interval for one polling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Number of ticks that attempt finalize/refresh work. The tick after
    /// the last budgeted one performs the single best-effort refresh and
    /// stops.
    pub max_attempts: u32,
    /// Fixed delay before each tick.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(5),
        }
    }
}

impl PollPolicy {
    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(FlightdeckError::InvalidArgument(
                "max_attempts must be greater than zero".into(),
            ));
        }
        if self.interval.is_zero() {
            return Err(FlightdeckError::InvalidArgument(
                "interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// The two injected operations a session drives.
///
/// Implementations must swallow transport errors and report a definite
/// success/failure signal. The engine treats `false` as "not ready yet" and
/// never distinguishes an explicit rejection from a pending callback — both
/// simply extend the retry loop up to the attempt budget.
#[async_trait]
pub trait FlowHooks: Send + Sync + 'static {
    /// Exchange the pending browser authorization for a server-side session.
    /// Must be safe to call repeatedly with the same state string.
    async fn finalize(&self, state: &str) -> bool;

    /// Re-fetch the application snapshot; `true` once it reflects the
    /// expected post-finalize state.
    async fn refresh(&self) -> bool;
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Finalize and refresh both succeeded.
    Completed,
    /// Attempt budget exhausted after one final best-effort refresh.
    Exhausted,
}

/// Externally observable state of the current (or most recent) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSnapshot {
    pub active: bool,
    pub finalized: bool,
    pub attempts: u32,
    pub outcome: Option<PollOutcome>,
}

impl PollSnapshot {
    fn idle() -> Self {
        Self {
            active: false,
            finalized: false,
            attempts: 0,
            outcome: None,
        }
    }

    fn started() -> Self {
        Self {
            active: true,
            ..Self::idle()
        }
    }
}

struct PollerState {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

/// Drives one finalize/refresh session at a time.
///
/// All methods are `&self`; the poller can be shared behind an `Arc` and
/// observed from other tasks via [`watch`](Self::watch).
pub struct FinalizePoller {
    hooks: Arc<dyn FlowHooks>,
    policy: PollPolicy,
    state: Arc<Mutex<PollerState>>,
    snapshot_tx: watch::Sender<PollSnapshot>,
    snapshot_rx: watch::Receiver<PollSnapshot>,
}

impl FinalizePoller {
    /// Create a poller.
    ///
    /// # Errors
    ///
    /// Returns [`FlightdeckError::InvalidArgument`] if the policy has a zero
    /// attempt budget or a zero interval.
    pub fn new(hooks: Arc<dyn FlowHooks>, policy: PollPolicy) -> Result<Self> {
        policy.validate()?;
        let (snapshot_tx, snapshot_rx) = watch::channel(PollSnapshot::idle());
        Ok(Self {
            hooks,
            policy,
            state: Arc::new(Mutex::new(PollerState {
                generation: 0,
                task: None,
            })),
            snapshot_tx,
            snapshot_rx,
        })
    }

    /// Begin a new polling session for `state`.
    ///
    /// Any session still running on this poller is superseded: its timer is
    /// cancelled and none of its in-flight work can touch the new session's
    /// counters. Attempts and the finalized flag always restart from zero.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_poll(&self, state: impl Into<String>) {
        let oauth_state = state.into();
        tracing::debug!(state = %oauth_state, "starting finalization poll");

        let mut guard = self.lock_state();
        guard.generation += 1;
        if let Some(task) = guard.task.take() {
            task.abort();
        }
        // Reset under the lock so a superseded task cannot interleave a
        // stale publish between this reset and its own generation check.
        self.snapshot_tx.send_replace(PollSnapshot::started());

        let session = Session {
            generation: guard.generation,
            oauth_state,
            hooks: Arc::clone(&self.hooks),
            policy: self.policy,
            state: Arc::clone(&self.state),
            snapshot_tx: self.snapshot_tx.clone(),
        };
        guard.task = Some(tokio::spawn(session.run()));
    }

    /// Stop the current session, if any, without starting a new one.
    pub fn cancel(&self) {
        let mut guard = self.lock_state();
        guard.generation += 1;
        if let Some(task) = guard.task.take() {
            task.abort();
            self.snapshot_tx.send_modify(|snapshot| snapshot.active = false);
        }
    }

    /// Whether a session is currently running.
    pub fn is_active(&self) -> bool {
        self.snapshot_rx.borrow().active
    }

    /// Point-in-time view of the current (or most recent) session.
    pub fn snapshot(&self) -> PollSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    ///
    /// Callers can `.changed().await` or `.wait_for(..)` on the returned
    /// receiver to observe session progress and termination.
    pub fn watch(&self) -> watch::Receiver<PollSnapshot> {
        self.snapshot_rx.clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, PollerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One run of the bounded retry loop, owned by a spawned task.
struct Session {
    generation: u64,
    oauth_state: String,
    hooks: Arc<dyn FlowHooks>,
    policy: PollPolicy,
    state: Arc<Mutex<PollerState>>,
    snapshot_tx: watch::Sender<PollSnapshot>,
}

impl Session {
    async fn run(self) {
        let mut attempts: u32 = 0;
        let mut finalized = false;

        loop {
            tokio::time::sleep(self.policy.interval).await;
            attempts += 1;
            if !self.publish(|snapshot| snapshot.attempts = attempts) {
                return; // superseded
            }
            tracing::debug!(attempt = attempts, finalized, "finalization poll tick");

            if attempts > self.policy.max_attempts {
                tracing::warn!(
                    max_attempts = self.policy.max_attempts,
                    "giving up on finalization poll"
                );
                // Best effort: a session or character may have arrived even
                // though finalize never confirmed.
                let _ = self.hooks.refresh().await;
                self.finish(PollOutcome::Exhausted);
                return;
            }

            if !finalized {
                if self.hooks.finalize(&self.oauth_state).await {
                    finalized = true;
                    if !self.publish(|snapshot| snapshot.finalized = true) {
                        return;
                    }
                    tracing::debug!("finalization succeeded; fetching refreshed data");
                    if self.hooks.refresh().await {
                        self.finish(PollOutcome::Completed);
                        return;
                    }
                } else {
                    tracing::debug!("not ready yet; will retry finalize");
                }
            } else if self.hooks.refresh().await {
                self.finish(PollOutcome::Completed);
                return;
            } else {
                tracing::debug!("still no data after finalization; will retry refresh");
            }
        }
    }

    fn finish(&self, outcome: PollOutcome) {
        self.publish(|snapshot| {
            snapshot.active = false;
            snapshot.outcome = Some(outcome);
        });
    }

    /// Apply `update` to the shared snapshot unless this session has been
    /// superseded. Returns `false` when stale.
    fn publish(&self, update: impl FnOnce(&mut PollSnapshot)) -> bool {
        let guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.generation != self.generation {
            return false;
        }
        self.snapshot_tx.send_modify(update);
        true
    }
}
