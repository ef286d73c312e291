//! Outbound guest messages.
//!
//! Serialized with serde's externally tagged enum layout, which yields
//! exactly the shapes the game server's event decoder accepts.
//!
//! # Format
//!
//! | Message | JSON |
//! |---------|------|
//! | `SetName` | `{"SetName":"abcde"}` |
//! | `SetGuess` | `{"SetGuess":"Bride"}` / `{"SetGuess":"Groom"}` |
//! | `RemoveName` | `"RemoveName"` |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::to_string;
use tokio_tungstenite::tungstenite::Message;

use crate::error::Result;

// ============================================================================
// Espoused
// ============================================================================

/// Which half of the couple a guess names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Espoused {
    /// The bride.
    Bride,
    /// The groom.
    Groom,
}

impl Espoused {
    /// Both possible answers.
    pub const ALL: [Self; 2] = [Self::Bride, Self::Groom];

    /// Picks one side uniformly at random.
    #[inline]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Returns the wire name.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bride => "Bride",
            Self::Groom => "Groom",
        }
    }
}

impl fmt::Display for Espoused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ClientMessage
// ============================================================================

/// A message sent from a simulated guest to the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Join the game (or rejoin) under a display name.
    SetName(String),

    /// Guess who the current question is about.
    SetGuess(Espoused),

    /// Leave the game, dropping the current name.
    RemoveName,
}

impl ClientMessage {
    /// Returns the variant name, used for logging and counters.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SetName(_) => "SetName",
            Self::SetGuess(_) => "SetGuess",
            Self::RemoveName => "RemoveName",
        }
    }

    /// Serializes the message to its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    #[inline]
    pub fn to_json(&self) -> Result<String> {
        Ok(to_string(self)?)
    }

    /// Builds the WebSocket text frame carrying this message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    #[inline]
    pub fn to_frame(&self) -> Result<Message> {
        Ok(Message::Text(self.to_json()?.into()))
    }
}

// ============================================================================
// Tests
// ============================================================================
