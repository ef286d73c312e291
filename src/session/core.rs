//! One simulated guest.
//!
//! A [`Session`] owns a single WebSocket connection and drives it with two
//! loops polled side by side:
//!
//! - **sender**: joins with a name, then guesses (or occasionally leaves and
//!   rejoins) with randomized pauses
//! - **receiver**: drains whatever the server pushes so its frames never
//!   pile up in the socket buffer
//!
//! Whichever loop ends first, or the cancellation token firing, ends both.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::ClientMessage;
use crate::stats::Stats;
use crate::transport::{self, WsSink, WsSource};

use super::behavior::{Action, Behavior, random_name};

// ============================================================================
// Session
// ============================================================================

/// A simulated guest bound to one server connection.
pub(crate) struct Session {
    /// Identifier sent as the `uuid` query parameter.
    id: SessionId,
    /// Position in the driver's fan-out, for logging.
    index: usize,
    /// Fully built endpoint (`<base>/ws?uuid=<id>`).
    url: Url,
    /// Shared run parameters.
    config: Arc<SessionConfig>,
    /// Per-session randomness.
    rng: StdRng,
}

/// Parameters every session of a run shares.
#[derive(Debug)]
pub(crate) struct SessionConfig {
    pub behavior: Behavior,
    pub connect_timeout: Duration,
    pub stats: Arc<Stats>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session; nothing is connected until [`Session::run`].
    ///
    /// With a `seed`, the session's RNG is derived from `seed` and `index`
    /// so a run's action sequence is reproducible.
    pub(crate) fn new(
        id: SessionId,
        index: usize,
        base_url: &Url,
        config: Arc<SessionConfig>,
        seed: Option<u64>,
    ) -> Result<Self> {
        let url = transport::session_url(base_url, &id)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            id,
            index,
            url,
            config,
            rng,
        })
    }

    /// Connects and runs until `cancel` fires or the connection fails.
    ///
    /// Returns `Ok(())` when stopped through `cancel`.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] / [`Error::ConnectionTimeout`] if connecting fails
    /// - [`Error::ConnectionClosed`] if the server closes the socket
    /// - [`Error::WebSocket`] on a send or receive failure
    pub(crate) async fn run(self, cancel: CancellationToken) -> Result<()> {
        let Self {
            id,
            index,
            url,
            config,
            mut rng,
        } = self;

        let ws_stream = tokio::select! {
            connected = transport::connect(&url, config.connect_timeout) => connected?,
            () = cancel.cancelled() => {
                debug!(session_id = %id, index, "Cancelled before connecting");
                return Ok(());
            }
        };

        config.stats.session_connected();
        debug!(session_id = %id, index, "Session connected");

        let (mut sink, mut source) = ws_stream.split();

        let outcome = tokio::select! {
            result = Self::produce(&mut sink, &config, &mut rng, id) => result,
            result = Self::drain(&mut source, &config.stats) => result,
            () = cancel.cancelled() => Ok(()),
        };

        if let Err(e) = sink.close().await {
            debug!(session_id = %id, error = %e, "Close handshake failed");
        }

        config.stats.session_disconnected();
        debug!(session_id = %id, index, ok = outcome.is_ok(), "Session ended");

        outcome
    }

    /// Sender loop: name first, then guesses forever.
    async fn produce(
        sink: &mut WsSink,
        config: &SessionConfig,
        rng: &mut StdRng,
        id: SessionId,
    ) -> Result<()> {
        let behavior = &config.behavior;

        let name = random_name(rng);
        debug!(session_id = %id, %name, "Joining game");
        Self::send(sink, &config.stats, id, ClientMessage::SetName(name)).await?;

        loop {
            match behavior.next_action(rng) {
                Action::Guess(choice) => {
                    Self::send(sink, &config.stats, id, ClientMessage::SetGuess(choice)).await?;
                }
                Action::RemoveName => {
                    Self::send(sink, &config.stats, id, ClientMessage::RemoveName).await?;
                    sleep(behavior.rename_delay(rng)).await;

                    let name = random_name(rng);
                    debug!(session_id = %id, %name, "Rejoining game");
                    Self::send(sink, &config.stats, id, ClientMessage::SetName(name)).await?;
                }
            }

            sleep(behavior.guess_delay(rng)).await;
        }
    }

    /// Receiver loop: discard everything until the stream ends.
    async fn drain(source: &mut WsSource, stats: &Stats) -> Result<()> {
        loop {
            match source.next().await {
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "WebSocket closed by server");
                    return Err(Error::ConnectionClosed);
                }
                Some(Ok(_)) => stats.message_received(),
                Some(Err(e)) => return Err(e.into()),
                None => return Err(Error::ConnectionClosed),
            }
        }
    }

    /// Serializes and sends one message.
    async fn send(
        sink: &mut WsSink,
        stats: &Stats,
        id: SessionId,
        message: ClientMessage,
    ) -> Result<()> {
        sink.send(message.to_frame()?).await?;
        stats.message_sent(&message);
        trace!(session_id = %id, kind = message.kind(), "Message sent");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
