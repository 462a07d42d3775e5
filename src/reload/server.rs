// src/reload/server.rs

//! WebSocket endpoint for browser clients.
//!
//! Clients connect, receive every reload event as a JSON text frame, and are
//! dropped when they close or their socket fails.
//!
//! Threads:
//! - `reload-accept` takes TCP connections and hands each one to its own
//!   short-lived handshake thread, bounded by [`HANDSHAKE_TIMEOUT`].
//! - `reload-clients` polls every client: flushes queued frames, reads and
//!   discards incoming frames, and prunes closed or broken connections.
//!
//! After the handshake every socket is non-blocking, so [`ReloadServer::send`]
//! only queues frames and never waits on a slow client.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::Duration;

use anyhow::{Context, anyhow};
use tracing::{debug, info, warn};
use tungstenite::protocol::Message;
use tungstenite::{Error as WsError, WebSocket};

use super::{ReloadEvent, ReloadNotifier};
use crate::errors::Result;

/// Longest a new connection may take to complete the WebSocket handshake.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

type ClientList = Mutex<Vec<WebSocket<TcpStream>>>;

pub struct ReloadServer {
    local_addr: SocketAddr,
    clients: Arc<ClientList>,
}

impl std::fmt::Debug for ReloadServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadServer")
            .field("local_addr", &self.local_addr)
            .finish_non_exhaustive()
    }
}

impl ReloadServer {
    /// Bind `addr` and start accepting clients in the background.
    ///
    /// Background threads only hold weak references to the client list and
    /// wind down once the server is dropped.
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let listener =
            TcpListener::bind(addr).with_context(|| format!("binding reload server on {addr}"))?;
        let local_addr = listener.local_addr()?;
        let clients: Arc<ClientList> = Arc::new(Mutex::new(Vec::new()));

        let accept_clients = Arc::downgrade(&clients);
        thread::Builder::new()
            .name("reload-accept".to_string())
            .spawn(move || accept_loop(listener, accept_clients))
            .context("spawning reload accept thread")?;

        let polled_clients = Arc::downgrade(&clients);
        thread::Builder::new()
            .name("reload-clients".to_string())
            .spawn(move || client_poll_loop(polled_clients))
            .context("spawning reload client thread")?;

        info!(%local_addr, "reload server listening");
        Ok(Self {
            local_addr,
            clients,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn client_count(&self) -> usize {
        self.clients.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl ReloadNotifier for ReloadServer {
    fn send(&self, event: &ReloadEvent) -> Result<()> {
        let text = event.to_json()?;
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| anyhow!("reload client list poisoned"))?;

        let before = clients.len();
        clients.retain_mut(|ws| match ws.send(Message::Text(text.clone().into())) {
            Ok(()) => true,
            // Frame is queued; the poll thread finishes the write.
            Err(WsError::Io(ref e)) if e.kind() == io::ErrorKind::WouldBlock => true,
            Err(e) => {
                debug!(error = %e, "dropping reload client");
                false
            }
        });
        debug!(sent = clients.len(), dropped = before - clients.len(), "reload broadcast");
        Ok(())
    }
}

fn accept_loop(listener: TcpListener, clients: Weak<ClientList>) {
    for stream in listener.incoming() {
        if clients.strong_count() == 0 {
            debug!("reload server dropped; stopping accept loop");
            return;
        }
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to accept reload client");
                continue;
            }
        };

        let clients = clients.clone();
        let spawned = thread::Builder::new()
            .name("reload-handshake".to_string())
            .spawn(move || handshake(stream, clients));
        if let Err(e) = spawned {
            warn!(error = %e, "failed to spawn reload handshake thread");
        }
    }
}

fn handshake(stream: TcpStream, clients: Weak<ClientList>) {
    if let Err(e) = stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT)) {
        debug!(error = %e, "cannot bound reload handshake; rejecting client");
        return;
    }

    let ws = match tungstenite::accept(stream) {
        Ok(ws) => ws,
        Err(e) => {
            debug!(error = %e, "reload handshake failed");
            return;
        }
    };

    let socket = ws.get_ref();
    if let Err(e) = socket
        .set_read_timeout(None)
        .and_then(|()| socket.set_nonblocking(true))
    {
        debug!(error = %e, "cannot switch reload client to non-blocking; rejecting client");
        return;
    }

    let Some(clients) = clients.upgrade() else {
        return;
    };
    let Ok(mut guard) = clients.lock() else {
        warn!("reload client list poisoned; rejecting client");
        return;
    };
    guard.push(ws);
    debug!(total = guard.len(), "reload client connected");
}

fn client_poll_loop(clients: Weak<ClientList>) {
    loop {
        thread::sleep(POLL_INTERVAL);

        let Some(clients) = clients.upgrade() else {
            debug!("reload server dropped; stopping client poll loop");
            return;
        };
        let Ok(mut guard) = clients.lock() else {
            warn!("reload client list poisoned; stopping client poll loop");
            return;
        };

        guard.retain_mut(poll_client);
    }
}

/// Drive one client without blocking. Returns whether to keep it.
fn poll_client(ws: &mut WebSocket<TcpStream>) -> bool {
    if let Err(e) = ws.flush() {
        if !is_would_block(&e) {
            debug!(error = %e, "reload client write failed; dropping");
            return false;
        }
    }

    loop {
        match ws.read() {
            Ok(Message::Close(_)) => {
                debug!("reload client closed the connection");
                return false;
            }
            Ok(_) => continue,
            Err(e) if is_would_block(&e) => return true,
            Err(e) => {
                debug!(error = %e, "reload client read failed; dropping");
                return false;
            }
        }
    }
}

fn is_would_block(err: &WsError) -> bool {
    matches!(err, WsError::Io(e) if e.kind() == io::ErrorKind::WouldBlock)
}
