//! guest-swarm - WebSocket load generator for the wedding guessing game.
//!
//! Opens many concurrent guest sessions against the game server's `/ws`
//! endpoint. Every guest joins with a random name, then keeps guessing
//! `Bride` or `Groom` every few seconds and now and then leaves and rejoins,
//! while the server's broadcasts are drained and dropped.
//!
//! # Architecture
//!
//! - **Driver**: one supervised tokio task per session, shared cancellation
//! - **Session**: one WebSocket split into a sender loop and a receiver loop
//! - **Isolation**: a failing session is logged and counted, the rest keep
//!   running
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use guest_swarm::{Driver, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let driver = Driver::builder()
//!         .url("ws://localhost:8080")
//!         .connections(200)
//!         .run_for(Duration::from_secs(120))
//!         .build()?;
//!
//!     let summary = driver.run().await?;
//!     println!("{summary}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`driver`] | [`Driver`], [`DriverBuilder`], [`SwarmOptions`] |
//! | [`session`] | [`Behavior`], [`DelayRange`] and random helpers |
//! | [`protocol`] | Outbound wire messages |
//! | [`transport`] | Session URL and WebSocket connect |
//! | [`identifiers`] | [`SessionId`] |
//! | [`stats`] | [`Stats`] and [`RunSummary`] |
//! | [`error`] | Error types and [`Result`] alias |

// ============================================================================
// Modules
// ============================================================================

/// Load test coordinator and configuration.
///
/// Use [`Driver::builder()`] to create a configured driver instance.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Outbound WebSocket message types.
pub mod protocol;

/// Simulated guest sessions.
pub mod session;

/// Run counters and summaries.
pub mod stats;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Driver types
pub use driver::{Driver, DriverBuilder, SwarmOptions};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::SessionId;

// Protocol types
pub use protocol::{ClientMessage, Espoused};

// Session types
pub use session::{Action, Behavior, DelayRange};

// Stats types
pub use stats::{MessageCounts, RunSummary, SessionCounts, Stats};
