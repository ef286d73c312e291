//! Load test run options.
//!
//! [`SwarmOptions`] is the validated form of a [`DriverBuilder`]
//! configuration. Library users normally go through the builder; the
//! struct is public so a running [`Driver`] can report what it was
//! configured with.
//!
//! [`DriverBuilder`]: super::DriverBuilder
//! [`Driver`]: super::Driver

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::session::Behavior;

// ============================================================================
// Constants
// ============================================================================

/// Game server address used when no URL is configured.
pub const DEFAULT_BASE_URL: &str = "ws://localhost:8080";

/// Number of concurrent guest sessions.
pub const DEFAULT_CONNECTIONS: usize = 200;

/// Time allowed for each WebSocket handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between progress log lines.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10);

// ============================================================================
// SwarmOptions
// ============================================================================

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmOptions {
    /// Number of sessions opened concurrently.
    pub connections: usize,

    /// Handshake timeout per session.
    pub connect_timeout: Duration,

    /// Stop the run after this long; `None` runs until shut down.
    pub run_duration: Option<Duration>,

    /// Progress log interval; `None` disables progress lines.
    pub report_interval: Option<Duration>,

    /// Base seed for per-session RNGs; `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Guest behavior shared by all sessions.
    pub behavior: Behavior,
}

impl Default for SwarmOptions {
    fn default() -> Self {
        Self {
            connections: DEFAULT_CONNECTIONS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            run_duration: None,
            report_interval: Some(DEFAULT_REPORT_INTERVAL),
            seed: None,
            behavior: Behavior::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
