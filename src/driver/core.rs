//! Load test coordinator.
//!
//! The [`Driver`] fans out one supervised task per guest session, waits for
//! all of them, and owns the cancellation token that stops them.
//!
//! # Example
//!
//! ```no_run
//! use guest_swarm::Driver;
//!
//! # async fn example() -> guest_swarm::Result<()> {
//! let driver = Driver::builder().connections(50).build()?;
//!
//! let stopper = driver.clone();
//! tokio::spawn(async move {
//!     tokio::signal::ctrl_c().await.ok();
//!     stopper.shutdown();
//! });
//!
//! let summary = driver.run().await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::session::{Session, SessionConfig};
use crate::stats::{RunSummary, Stats};

use super::builder::DriverBuilder;
use super::options::SwarmOptions;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the driver.
pub(crate) struct DriverInner {
    /// Game server base URL.
    pub base_url: Url,

    /// Validated run options.
    pub options: SwarmOptions,

    /// Counters shared with every session.
    pub stats: Arc<Stats>,

    /// Parent token; every session gets a child.
    pub cancel: CancellationToken,

    /// Set by the first call to [`Driver::run`]; a driver runs once.
    pub started: AtomicBool,
}

// ============================================================================
// Driver
// ============================================================================

/// Load test coordinator.
///
/// The driver is responsible for:
/// - Allocating unique session IDs
/// - Spawning one task per session and containing its failures
/// - Stopping every session on shutdown or when the run duration elapses
/// - Reporting progress and the final [`RunSummary`]
///
/// Cloning is cheap; clones share state, so one clone can call
/// [`Driver::shutdown`] while another is inside [`Driver::run`].
#[derive(Clone)]
pub struct Driver {
    /// Shared inner state.
    pub(crate) inner: Arc<DriverInner>,
}

// ============================================================================
// Driver - Display
// ============================================================================

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("base_url", &self.inner.base_url.as_str())
            .field("connections", &self.inner.options.connections)
            .field("shutdown", &self.is_shutdown())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Driver - Public API
// ============================================================================

impl Driver {
    /// Creates a configuration builder for the driver.
    #[inline]
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::new()
    }

    /// Returns the game server base URL.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Returns the validated run options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &SwarmOptions {
        &self.inner.options
    }

    /// Returns the live run counters.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.inner.stats
    }

    /// Returns `true` once [`Driver::shutdown`] has been called.
    #[inline]
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Stops every session; [`Driver::run`] returns once they have closed.
    pub fn shutdown(&self) {
        if !self.inner.cancel.is_cancelled() {
            info!("Shutting down all sessions");
        }
        self.inner.cancel.cancel();
    }

    /// Runs the load test. A driver runs at most once.
    ///
    /// Opens every session concurrently and waits until all of them have
    /// ended. A session that fails is logged and counted; it never stops the
    /// others. Without a run duration this only returns after
    /// [`Driver::shutdown`] or once every session has failed.
    ///
    /// # Errors
    ///
    /// - [`Error::Shutdown`] if the driver was already shut down
    /// - [`Error::AlreadyRunning`] if this driver, or a clone of it, has
    ///   already started a run
    pub async fn run(&self) -> Result<RunSummary> {
        if self.is_shutdown() {
            return Err(Error::Shutdown);
        }
        if self.inner.started.swap(true, Ordering::AcqRel) {
            return Err(Error::AlreadyRunning);
        }

        let options = &self.inner.options;
        let stats = &self.inner.stats;
        stats.start();

        info!(
            url = %self.inner.base_url,
            connections = options.connections,
            duration_secs = options.run_duration.map(|d| d.as_secs_f64()),
            "Starting load test"
        );

        let mut sessions = self.spawn_sessions()?;

        // Cancelled when this run returns, or by shutdown via the parent.
        let run_done = self.inner.cancel.child_token();
        if let Some(duration) = options.run_duration {
            tokio::spawn(Self::stop_after(
                duration,
                self.inner.cancel.clone(),
                run_done.clone(),
            ));
        }
        if let Some(period) = options.report_interval {
            tokio::spawn(Self::report_progress(
                period,
                Arc::clone(stats),
                run_done.clone(),
            ));
        }

        while let Some(joined) = sessions.join_next().await {
            match joined {
                Ok((_, Ok(()))) => stats.session_finished(),
                Ok((id, Err(e))) => {
                    stats.session_failed();
                    warn!(session_id = %id, error = %e, "Session failed");
                }
                Err(e) => {
                    stats.session_failed();
                    let err = Error::task_failed(&e);
                    error!(error = %err, "Session task aborted");
                }
            }
        }

        run_done.cancel();
        stats.stop();

        let summary = stats.summary();
        info!(%summary, "Load test finished");

        Ok(summary)
    }
}

// ============================================================================
// Driver - Internal API
// ============================================================================

impl Driver {
    /// Creates a new driver instance from validated configuration.
    pub(crate) fn new(base_url: Url, options: SwarmOptions) -> Self {
        let inner = Arc::new(DriverInner {
            base_url,
            options,
            stats: Arc::new(Stats::new()),
            cancel: CancellationToken::new(),
            started: AtomicBool::new(false),
        });

        debug!(url = %inner.base_url, "Driver initialized");

        Self { inner }
    }

    /// Spawns one task per session.
    fn spawn_sessions(&self) -> Result<JoinSet<(SessionId, Result<()>)>> {
        let options = &self.inner.options;
        let config = Arc::new(SessionConfig {
            behavior: options.behavior,
            connect_timeout: options.connect_timeout,
            stats: Arc::clone(&self.inner.stats),
        });

        let mut sessions = JoinSet::new();

        for (index, id) in SessionId::unique_batch(options.connections)
            .into_iter()
            .enumerate()
        {
            let session = Session::new(
                id,
                index,
                &self.inner.base_url,
                Arc::clone(&config),
                options.seed,
            )?;
            let cancel = self.inner.cancel.child_token();

            self.inner.stats.session_launched();
            sessions.spawn(async move { (id, session.run(cancel).await) });
        }

        debug!(count = sessions.len(), "Sessions spawned");

        Ok(sessions)
    }

    /// Cancels `cancel` after `duration`, unless the run is `done` first.
    async fn stop_after(duration: Duration, cancel: CancellationToken, done: CancellationToken) {
        tokio::select! {
            () = sleep(duration) => {
                info!(duration_secs = duration.as_secs_f64(), "Run duration elapsed");
                cancel.cancel();
            }
            () = done.cancelled() => {}
        }
    }

    /// Logs a progress line every `period` until `done` fires.
    async fn report_progress(period: Duration, stats: Arc<Stats>, done: CancellationToken) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let summary = stats.summary();
                    info!(
                        active = summary.sessions.active,
                        failed = summary.sessions.failed,
                        sent = summary.messages.sent(),
                        received = summary.messages.received,
                        send_rate = summary.send_rate,
                        "Progress"
                    );
                }
                () = done.cancelled() => break,
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
