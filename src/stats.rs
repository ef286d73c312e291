//! Run-wide counters.
//!
//! Sessions update [`Stats`] with relaxed atomics; the driver turns them into
//! a [`RunSummary`] for progress lines and the final report.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

use crate::protocol::{ClientMessage, Espoused};

// ============================================================================
// Stats
// ============================================================================

/// Live counters shared by every session of a run.
#[derive(Debug, Default)]
pub struct Stats {
    sessions_launched: AtomicU64,
    sessions_connected: AtomicU64,
    sessions_failed: AtomicU64,
    sessions_finished: AtomicU64,
    sessions_active: AtomicU64,
    names_sent: AtomicU64,
    bride_guesses_sent: AtomicU64,
    groom_guesses_sent: AtomicU64,
    removals_sent: AtomicU64,
    messages_received: AtomicU64,
    started_at: Mutex<Option<Instant>>,
    stopped_at: Mutex<Option<Instant>>,
}

impl Stats {
    /// Creates zeroed counters.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of the run.
    pub fn start(&self) {
        *self.started_at.lock() = Some(Instant::now());
        *self.stopped_at.lock() = None;
    }

    /// Marks the end of the run; elapsed time stops advancing.
    pub fn stop(&self) {
        *self.stopped_at.lock() = Some(Instant::now());
    }

    /// Time since [`Stats::start`], up to [`Stats::stop`] if called.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        let Some(start) = *self.started_at.lock() else {
            return Duration::ZERO;
        };
        match *self.stopped_at.lock() {
            Some(stop) => stop.saturating_duration_since(start),
            None => start.elapsed(),
        }
    }

    pub(crate) fn session_launched(&self) {
        self.sessions_launched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn session_connected(&self) {
        self.sessions_connected.fetch_add(1, Ordering::Relaxed);
        self.sessions_active.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn session_disconnected(&self) {
        self.sessions_active.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn session_failed(&self) {
        self.sessions_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn session_finished(&self) {
        self.sessions_finished.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn message_sent(&self, message: &ClientMessage) {
        let counter = match message {
            ClientMessage::SetName(_) => &self.names_sent,
            ClientMessage::SetGuess(Espoused::Bride) => &self.bride_guesses_sent,
            ClientMessage::SetGuess(Espoused::Groom) => &self.groom_guesses_sent,
            ClientMessage::RemoveName => &self.removals_sent,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a consistent-enough snapshot of the counters.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);

        let messages = MessageCounts {
            names: load(&self.names_sent),
            bride_guesses: load(&self.bride_guesses_sent),
            groom_guesses: load(&self.groom_guesses_sent),
            removals: load(&self.removals_sent),
            received: load(&self.messages_received),
        };

        let elapsed = self.elapsed().as_secs_f64();
        let send_rate = if elapsed > 0.0 {
            messages.sent() as f64 / elapsed
        } else {
            0.0
        };

        RunSummary {
            elapsed_secs: elapsed,
            send_rate,
            sessions: SessionCounts {
                launched: load(&self.sessions_launched),
                connected: load(&self.sessions_connected),
                failed: load(&self.sessions_failed),
                finished: load(&self.sessions_finished),
                active: load(&self.sessions_active),
            },
            messages,
        }
    }
}

// ============================================================================
// RunSummary
// ============================================================================

/// Session lifecycle counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounts {
    /// Sessions spawned by the driver.
    pub launched: u64,
    /// Sessions whose handshake succeeded.
    pub connected: u64,
    /// Sessions that ended with an error.
    pub failed: u64,
    /// Sessions that ended because the run was stopped.
    pub finished: u64,
    /// Sessions currently holding an open connection.
    pub active: u64,
}

/// Message counts, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageCounts {
    /// `SetName` messages sent.
    pub names: u64,
    /// `SetGuess` messages for the bride.
    pub bride_guesses: u64,
    /// `SetGuess` messages for the groom.
    pub groom_guesses: u64,
    /// `RemoveName` messages sent.
    pub removals: u64,
    /// Frames drained from the server.
    pub received: u64,
}

impl MessageCounts {
    /// All `SetGuess` messages.
    #[inline]
    #[must_use]
    pub const fn guesses(&self) -> u64 {
        self.bride_guesses + self.groom_guesses
    }

    /// Every message sent, of any kind.
    #[inline]
    #[must_use]
    pub const fn sent(&self) -> u64 {
        self.names + self.guesses() + self.removals
    }
}

/// Snapshot of a run's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Seconds since the run started.
    pub elapsed_secs: f64,
    /// Messages sent per second over the whole run.
    pub send_rate: f64,
    /// Session lifecycle counts.
    pub sessions: SessionCounts,
    /// Message counts.
    pub messages: MessageCounts,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}s: sessions {} launched / {} connected / {} failed / {} active, \
             sent {} (names {}, guesses {}, removals {}) at {:.1} msg/s, received {}",
            self.elapsed_secs,
            self.sessions.launched,
            self.sessions.connected,
            self.sessions.failed,
            self.sessions.active,
            self.messages.sent(),
            self.messages.names,
            self.messages.guesses(),
            self.messages.removals,
            self.send_rate,
            self.messages.received,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_stats_are_zero() {
        let stats = Stats::new();
        let summary = stats.summary();
        assert_eq!(summary.sessions, SessionCounts::default());
        assert_eq!(summary.messages, MessageCounts::default());
        assert_eq!(stats.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_session_accounting() {
        let stats = Stats::new();
        stats.session_launched();
        stats.session_launched();
        stats.session_connected();
        stats.session_disconnected();
        stats.session_failed();
        stats.session_finished();

        let sessions = stats.summary().sessions;
        assert_eq!(sessions.launched, 2);
        assert_eq!(sessions.connected, 1);
        assert_eq!(sessions.active, 0);
        assert_eq!(sessions.failed, 1);
        assert_eq!(sessions.finished, 1);
    }

    #[test]
    fn test_message_accounting() {
        let stats = Stats::new();
        stats.message_sent(&ClientMessage::SetName("abcde".into()));
        stats.message_sent(&ClientMessage::SetGuess(Espoused::Bride));
        stats.message_sent(&ClientMessage::SetGuess(Espoused::Groom));
        stats.message_sent(&ClientMessage::SetGuess(Espoused::Groom));
        stats.message_sent(&ClientMessage::RemoveName);
        stats.message_received();

        let messages = stats.summary().messages;
        assert_eq!(messages.names, 1);
        assert_eq!(messages.bride_guesses, 1);
        assert_eq!(messages.groom_guesses, 2);
        assert_eq!(messages.guesses(), 3);
        assert_eq!(messages.removals, 1);
        assert_eq!(messages.sent(), 5);
        assert_eq!(messages.received, 1);
    }

    #[test]
    fn test_elapsed_freezes_on_stop() {
        let stats = Stats::new();
        stats.start();
        std::thread::sleep(Duration::from_millis(10));
        stats.stop();

        let first = stats.elapsed();
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(stats.elapsed(), first);
        assert!(first >= Duration::from_millis(10));
    }

    #[test]
    fn test_summary_serializes() {
        let stats = Stats::new();
        stats.session_launched();
        let json = serde_json::to_value(stats.summary()).unwrap();
        assert_eq!(json["sessions"]["launched"], 1);
        assert_eq!(json["messages"]["names"], 0);
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary::default();
        let text = summary.to_string();
        assert!(text.contains("0 launched"));
        assert!(text.contains("received 0"));
    }
}
