//! In-process stand-in for the game server.
//!
//! Accepts WebSocket connections on a random local port, records every
//! guest message with its arrival time, and answers each one with a small
//! state update the way the real server broadcasts after an event.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures_util::{SinkExt, StreamExt};
use guest_swarm::ClientMessage;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::{accept_async, accept_hdr_async};

// ============================================================================
// Types
// ============================================================================

/// How the mock treats incoming connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Complete the handshake and record everything.
    Record,
    /// Drop the TCP stream before the handshake.
    CloseImmediately,
    /// Complete the handshake, then send a Close frame.
    CloseAfterHandshake,
    /// Even-numbered connections are recorded, odd ones closed after handshake.
    CloseAlternate,
}

/// One frame received from a guest.
#[derive(Debug, Clone)]
pub struct Received {
    /// Value of the `uuid` query parameter.
    pub session: String,
    /// Request path of the upgrade.
    pub path: String,
    /// Arrival time.
    pub at: Instant,
    /// Raw text.
    pub raw: String,
    /// Decoded message, `None` if the text was not a valid guest message.
    pub message: Option<ClientMessage>,
}

type Log = Arc<Mutex<Vec<Received>>>;

// ============================================================================
// MockServer
// ============================================================================

pub struct MockServer {
    port: u16,
    log: Log,
    accepted: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl MockServer {
    /// Binds to `127.0.0.1:0` and starts accepting.
    pub async fn spawn(mode: Mode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let log: Log = Arc::default();
        let accepted = Arc::new(AtomicUsize::new(0));

        let task = tokio::spawn({
            let log = Arc::clone(&log);
            let accepted = Arc::clone(&accepted);
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let index = accepted.fetch_add(1, Ordering::SeqCst);
                    let log = Arc::clone(&log);
                    tokio::spawn(handle(stream, index, mode, log));
                }
            }
        });

        Self {
            port,
            log,
            accepted,
            task,
        }
    }

    /// Base URL to hand to the driver.
    pub fn url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Number of TCP connections accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Everything received, in arrival order.
    pub fn messages(&self) -> Vec<Received> {
        self.log.lock().clone()
    }

    /// Received frames grouped by session, each in arrival order.
    pub fn by_session(&self) -> FxHashMap<String, Vec<Received>> {
        let mut grouped: FxHashMap<String, Vec<Received>> = FxHashMap::default();
        for received in self.messages() {
            grouped
                .entry(received.session.clone())
                .or_default()
                .push(received);
        }
        grouped
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ============================================================================
// Connection handling
// ============================================================================

async fn handle(stream: TcpStream, index: usize, mode: Mode, log: Log) {
    let close = match mode {
        Mode::Record => false,
        Mode::CloseImmediately => {
            drop(stream);
            return;
        }
        Mode::CloseAfterHandshake => true,
        Mode::CloseAlternate => index % 2 == 1,
    };

    if close {
        if let Ok(mut ws) = accept_async(stream).await {
            let _ = ws.close(None).await;
            // Let the client read the Close frame before the socket drops.
            while let Some(Ok(_)) = ws.next().await {}
        }
        return;
    }

    let mut path = String::new();
    let mut session = String::new();
    let upgraded = accept_hdr_async(stream, |request: &Request, response: Response| {
        path = request.uri().path().to_string();
        session = request
            .uri()
            .query()
            .and_then(|query| {
                query
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("uuid="))
            })
            .unwrap_or_default()
            .to_string();
        Ok::<Response, ErrorResponse>(response)
    })
    .await;

    let Ok(mut ws) = upgraded else {
        return;
    };

    let mut updates = 0u64;
    while let Some(Ok(frame)) = ws.next().await {
        let Message::Text(text) = frame else {
            continue;
        };

        let raw = text.as_str().to_owned();
        let message = serde_json::from_str::<ClientMessage>(&raw).ok();
        log.lock().push(Received {
            session: session.clone(),
            path: path.clone(),
            at: Instant::now(),
            raw,
            message,
        });

        updates += 1;
        let update = format!(r#"{{"count": {updates}, "private_count": 0 }}"#);
        if ws.send(Message::Text(update.into())).await.is_err() {
            break;
        }
    }
}
