//! Builder pattern for driver configuration.
//!
//! Provides a fluent API for configuring and creating [`Driver`] instances.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use guest_swarm::Driver;
//!
//! # fn example() -> guest_swarm::Result<()> {
//! let driver = Driver::builder()
//!     .url("ws://127.0.0.1:8080")
//!     .connections(500)
//!     .run_for(Duration::from_secs(60))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::session::{Behavior, DelayRange};

use super::core::Driver;
use super::options::{DEFAULT_BASE_URL, SwarmOptions};

// ============================================================================
// Constants
// ============================================================================

/// URL schemes the client transport can dial.
const SUPPORTED_SCHEMES: &[&str] = &["ws"];

// ============================================================================
// DriverBuilder
// ============================================================================

/// Builder for configuring a [`Driver`] instance.
///
/// Use [`Driver::builder()`] to create a new builder.
#[derive(Debug, Clone, Default)]
pub struct DriverBuilder {
    /// Game server base URL.
    url: Option<String>,
    /// Everything else, validated on build.
    options: SwarmOptions,
}

// ============================================================================
// DriverBuilder Implementation
// ============================================================================

impl DriverBuilder {
    /// Creates a new builder with default options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the game server base URL (e.g. `ws://localhost:8080`).
    ///
    /// Sessions connect to `<url>/ws?uuid=<id>`.
    #[inline]
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the number of concurrent sessions.
    #[inline]
    #[must_use]
    pub fn connections(mut self, count: usize) -> Self {
        self.options.connections = count;
        self
    }

    /// Sets the handshake timeout per session.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Stops the run after `duration`.
    #[inline]
    #[must_use]
    pub fn run_for(mut self, duration: Duration) -> Self {
        self.options.run_duration = Some(duration);
        self
    }

    /// Logs a progress line every `interval`.
    #[inline]
    #[must_use]
    pub fn report_every(mut self, interval: Duration) -> Self {
        self.options.report_interval = Some(interval);
        self
    }

    /// Disables progress lines.
    #[inline]
    #[must_use]
    pub fn no_reports(mut self) -> Self {
        self.options.report_interval = None;
        self
    }

    /// Seeds every session's RNG from `seed` for reproducible runs.
    #[inline]
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    /// Replaces the whole guest behavior.
    #[inline]
    #[must_use]
    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.options.behavior = behavior;
        self
    }

    /// Sets the per-cycle chance of leaving and rejoining.
    #[inline]
    #[must_use]
    pub fn remove_name_probability(mut self, probability: f64) -> Self {
        self.options.behavior.remove_name_probability = probability;
        self
    }

    /// Guests never leave; every cycle is a guess.
    #[inline]
    #[must_use]
    pub fn guess_only(self) -> Self {
        self.remove_name_probability(0.0)
    }

    /// Sets the pause after each action, uniform in `[min, max)`.
    #[inline]
    #[must_use]
    pub fn guess_interval(mut self, min: Duration, max: Duration) -> Self {
        self.options.behavior.guess_interval = DelayRange::new(min, max);
        self
    }

    /// Sets the pause between leaving and rejoining, uniform in `[min, max)`.
    #[inline]
    #[must_use]
    pub fn rename_delay(mut self, min: Duration, max: Duration) -> Self {
        self.options.behavior.rename_delay = DelayRange::new(min, max);
        self
    }

    /// Builds the driver with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if the URL does not parse
    /// - [`Error::Config`] for an unsupported scheme, zero connections, a
    ///   probability outside `[0, 1]`, or a delay range with `min > max`
    pub fn build(self) -> Result<Driver> {
        let url = self.validate_url()?;
        self.validate_options()?;

        Ok(Driver::new(url, self.options))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DriverBuilder {
    /// Parses the target URL and checks its scheme.
    fn validate_url(&self) -> Result<Url> {
        let raw = self.url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let url = Url::parse(raw)?;

        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(Error::config(format!(
                "Unsupported URL scheme '{}' in {raw}. Use a ws:// URL.\n\
                 Example: Driver::builder().url(\"ws://localhost:8080\")",
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(Error::config(format!("URL has no host: {raw}")));
        }

        Ok(url)
    }

    /// Checks counts, probabilities and delay ranges.
    fn validate_options(&self) -> Result<()> {
        let options = &self.options;

        if options.connections == 0 {
            return Err(Error::config("connections must be at least 1"));
        }

        let probability = options.behavior.remove_name_probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::config(format!(
                "remove-name probability must be within [0, 1], got {probability}"
            )));
        }

        for (label, range) in [
            ("guess interval", options.behavior.guess_interval),
            ("rename delay", options.behavior.rename_delay),
        ] {
            if !range.is_valid() {
                return Err(Error::config(format!(
                    "{label} minimum {:?} exceeds maximum {:?}",
                    range.min(),
                    range.max()
                )));
            }
        }

        if options.connect_timeout.is_zero() {
            return Err(Error::config("connect timeout must be non-zero"));
        }

        if options.report_interval.is_some_and(|interval| interval.is_zero()) {
            return Err(Error::config(
                "report interval must be non-zero; use no_reports() to disable",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
