//! Client side of the game server WebSocket.
//!
//! Builds the per-session endpoint URL and performs the handshake.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::SessionId;

// ============================================================================
// Constants
// ============================================================================

/// Path segment of the game server's WebSocket endpoint.
pub const WS_PATH: &str = "ws";

/// Query parameter carrying the session identifier.
pub const SESSION_QUERY_KEY: &str = "uuid";

// ============================================================================
// Types
// ============================================================================

/// An established client WebSocket.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of a split [`WsStream`].
pub type WsSink = SplitSink<WsStream, Message>;

/// Read half of a split [`WsStream`].
pub type WsSource = SplitStream<WsStream>;

// ============================================================================
// Functions
// ============================================================================

/// Builds `<base>/ws?uuid=<id>` for one session.
///
/// Any path on `base` is kept as a prefix and any existing query
/// parameters are preserved.
///
/// # Errors
///
/// Returns [`Error::Config`] if `base` cannot carry a path (e.g. `data:`).
pub fn session_url(base: &Url, id: &SessionId) -> Result<Url> {
    let mut url = base.clone();

    url.path_segments_mut()
        .map_err(|()| Error::config(format!("URL cannot be a base: {base}")))?
        .pop_if_empty()
        .push(WS_PATH);

    url.query_pairs_mut()
        .append_pair(SESSION_QUERY_KEY, &id.to_string());

    Ok(url)
}

/// Opens a WebSocket to `url`, giving up after `connect_timeout`.
///
/// # Errors
///
/// - [`Error::ConnectionTimeout`] if the handshake does not finish in time
/// - [`Error::Connection`] if the TCP connect or the upgrade fails
pub async fn connect(url: &Url, connect_timeout: Duration) -> Result<WsStream> {
    let handshake = timeout(connect_timeout, connect_async(url.as_str()))
        .await
        .map_err(|_| Error::connection_timeout(saturating_millis(connect_timeout)))?;

    let (ws_stream, response) =
        handshake.map_err(|e| Error::connection(format!("WebSocket handshake failed: {e}")))?;

    debug!(%url, status = %response.status(), "WebSocket connection established");

    Ok(ws_stream)
}

/// Milliseconds in `duration`, clamped to `u64::MAX`.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Tests
// ============================================================================
