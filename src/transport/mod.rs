//! WebSocket transport layer.
//!
//! This module handles the client connection from one simulated guest to
//! the game server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Session (Rust) │                              │  Game server    │
//! │                 │         WebSocket            │                 │
//! │  WsSink    ─────┼─────────────────────────────►│  /ws?uuid=...   │
//! │  WsSource  ◄────┼──────────────────────────────│                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `session_url` - Derive `<base>/ws?uuid=<id>`
//! 2. `connect` - Handshake with timeout
//! 3. Split into `WsSink` / `WsSource` for the sender and receiver loops
//! 4. Close the sink when the session ends

// ============================================================================
// Submodules
// ============================================================================

/// Client connection and URL construction.
pub mod connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{WsSink, WsSource, WsStream, connect, session_url};
