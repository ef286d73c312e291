//! Connection driver module.
//!
//! This module provides the main entry point for a load test run.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Driver`] | Fans out sessions, supervises them, shuts them down |
//! | [`DriverBuilder`] | Fluent configuration builder |
//! | [`SwarmOptions`] | Validated run options |
//!
//! # Example
//!
//! ```no_run
//! use guest_swarm::{Driver, Result};
//!
//! # async fn example() -> Result<()> {
//! let driver = Driver::builder()
//!     .url("ws://localhost:8080")
//!     .connections(200)
//!     .build()?;
//!
//! let summary = driver.run().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for driver configuration.
pub mod builder;

/// Core driver implementation.
pub mod core;

/// Run options and defaults.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::Driver;
pub use builder::DriverBuilder;
pub use options::SwarmOptions;
