//! Type-safe identifiers for simulated guests.
//!
//! The game server keys players by a UUID passed in the `uuid` query
//! parameter, so every session carries one.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// SessionId
// ============================================================================

/// Identifier of one simulated guest session.
///
/// Wraps a random (v4) UUID and renders in hyphenated form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a new random session ID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generates `count` pairwise distinct session IDs.
    ///
    /// A v4 collision is astronomically unlikely, but the server treats two
    /// sockets with the same UUID as one player, so duplicates are redrawn.
    #[must_use]
    pub fn unique_batch(count: usize) -> Vec<Self> {
        let mut seen = FxHashSet::default();
        seen.reserve(count);

        let mut ids = Vec::with_capacity(count);
        while ids.len() < count {
            let id = Self::generate();
            if seen.insert(id) {
                ids.push(id);
            }
        }
        ids
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl From<Uuid> for SessionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// Tests
// ============================================================================
