//! Simulated guest sessions.
//!
//! The driver owns the sessions themselves; this module exposes the
//! behavior model they follow.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Behavior`] | Action probabilities and pause ranges |
//! | [`DelayRange`] | Uniform `[min, max)` wait duration |
//! | [`Action`] | What a guest does on one cycle |

// ============================================================================
// Submodules
// ============================================================================

/// Randomized action selection and timing.
pub mod behavior;

/// Session connection and loops.
mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use behavior::{Action, Behavior, DelayRange, NAME_LEN, random_name};
pub(crate) use self::core::{Session, SessionConfig};
