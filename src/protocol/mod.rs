//! WebSocket protocol message types.
//!
//! This module defines what a simulated guest sends to the game server.
//! Frames coming back from the server are drained without being decoded,
//! so there are no inbound types here.
//!
//! # Protocol Overview
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | `SetName` | Guest → Server | Join under a display name |
//! | `SetGuess` | Guest → Server | Answer the current question |
//! | `RemoveName` | Guest → Server | Leave the game |

// ============================================================================
// Submodules
// ============================================================================

/// Outbound guest messages.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use message::{ClientMessage, Espoused};
