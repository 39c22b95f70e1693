//! Live reload
//!
//! A LiveReload-protocol WebSocket server. Browsers with the LiveReload
//! extension (or the livereload.js snippet) connect, complete the `hello`
//! handshake, and are told to reload after each successful upload.
//!
//! One accept thread plus one thread per browser; the session thread only
//! ever pushes messages into per-client channels.

mod protocol;

pub use protocol::{ClientMessage, ServerMessage, PROTOCOL_V7, SERVER_NAME};

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tungstenite::{Message, WebSocket};

use crate::error::{StyleSyncError, StyleSyncResult};

/// Default LiveReload port (what the browser extensions expect)
pub const DEFAULT_PORT: u16 = 35729;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that can tell browsers to reload
pub trait ReloadNotifier {
    /// Ask clients to reload `path`; returns how many clients were reached
    fn reload(&self, path: &str) -> usize;
}

type Clients = Arc<Mutex<Vec<Sender<ServerMessage>>>>;

/// Running LiveReload server; stops when dropped
pub struct LiveReloadServer {
    address: SocketAddr,
    clients: Clients,
    running: Arc<AtomicBool>,
    accept_thread: Option<thread::JoinHandle<()>>,
}

impl LiveReloadServer {
    /// Bind and start accepting browsers
    pub fn bind(addr: impl Into<SocketAddr>) -> StyleSyncResult<Self> {
        let addr = addr.into();
        let listener = TcpListener::bind(addr).map_err(|e| StyleSyncError::LiveReload {
            message: format!("cannot listen on {}: {}", addr, e),
        })?;
        listener.set_nonblocking(true)?;
        let address = listener.local_addr()?;

        let clients: Clients = Arc::new(Mutex::new(Vec::new()));
        let running = Arc::new(AtomicBool::new(true));

        let accept_thread = {
            let clients = clients.clone();
            let running = running.clone();
            thread::Builder::new()
                .name("livereload-accept".to_string())
                .spawn(move || accept_loop(listener, clients, running))?
        };

        tracing::info!(%address, "livereload server listening");
        Ok(Self {
            address,
            clients,
            running,
            accept_thread: Some(accept_thread),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.address
    }

    /// Number of connected browsers
    pub fn client_count(&self) -> usize {
        self.clients.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Send a message to every browser, pruning the ones that went away
    pub fn broadcast(&self, message: &ServerMessage) -> usize {
        let Ok(mut clients) = self.clients.lock() else {
            return 0;
        };
        clients.retain(|tx| tx.send(message.clone()).is_ok());
        clients.len()
    }

    /// Stop accepting and disconnect all browsers
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Ok(mut clients) = self.clients.lock() {
            clients.clear();
        }
        if let Some(handle) = self.accept_thread.take() {
            let _ = handle.join();
        }
    }
}

impl ReloadNotifier for LiveReloadServer {
    fn reload(&self, path: &str) -> usize {
        self.broadcast(&ServerMessage::reload(path))
    }
}

impl Drop for LiveReloadServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn accept_loop(listener: TcpListener, clients: Clients, running: Arc<AtomicBool>) {
    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                let (tx, rx) = channel();
                let running = running.clone();
                let spawned = thread::Builder::new()
                    .name(format!("livereload-{}", peer))
                    .spawn(move || {
                        if let Err(e) = serve_client(stream, rx, running) {
                            tracing::debug!(%peer, error = %e, "livereload client dropped");
                        }
                    });
                match spawned {
                    Ok(_) => {
                        if let Ok(mut clients) = clients.lock() {
                            clients.push(tx);
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "cannot spawn livereload client thread"),
                }
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                tracing::warn!(error = %e, "livereload accept failed");
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

fn serve_client(
    stream: TcpStream,
    rx: Receiver<ServerMessage>,
    running: Arc<AtomicBool>,
) -> Result<(), tungstenite::Error> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT))?;
    let mut ws = tungstenite::accept(stream).map_err(|e| match e {
        tungstenite::HandshakeError::Failure(err) => err,
        tungstenite::HandshakeError::Interrupted(_) => {
            tungstenite::Error::Io(std::io::Error::from(ErrorKind::TimedOut))
        }
    })?;
    ws.get_ref().set_read_timeout(Some(POLL_INTERVAL))?;
    tracing::debug!("livereload client connected");

    while running.load(Ordering::SeqCst) {
        match ws.read() {
            Ok(Message::Text(text)) => handle_client_message(&mut ws, &text)?,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(tungstenite::Error::ConnectionClosed) => break,
            Err(e) => return Err(e),
        }

        loop {
            match rx.try_recv() {
                Ok(message) => ws.send(Message::Text(message.to_json()))?,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    let _ = ws.close(None);
                    return Ok(());
                }
            }
        }
    }

    let _ = ws.close(None);
    Ok(())
}

fn handle_client_message(
    ws: &mut WebSocket<TcpStream>,
    text: &str,
) -> Result<(), tungstenite::Error> {
    match ClientMessage::parse(text) {
        Some(ClientMessage::Hello { protocols }) => {
            if !protocols.iter().any(|p| p == PROTOCOL_V7) {
                tracing::debug!(?protocols, "client did not offer protocol 7");
            }
            ws.send(Message::Text(ServerMessage::hello().to_json()))
        }
        Some(ClientMessage::Info { url }) => {
            tracing::debug!(url = url.as_deref().unwrap_or("-"), "livereload client page");
            Ok(())
        }
        Some(ClientMessage::Other) | None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Instant;

    fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        false
    }

    fn read_text(ws: &mut WebSocket<tungstenite::stream::MaybeTlsStream<TcpStream>>) -> String {
        loop {
            match ws.read().unwrap() {
                Message::Text(text) => return text,
                _ => continue,
            }
        }
    }

    #[test]
    fn reload_without_clients_reaches_nobody() {
        let server = LiveReloadServer::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        assert_eq!(server.client_count(), 0);
        assert_eq!(server.reload("css/site.css"), 0);
    }

    #[test]
    fn handshake_and_reload() {
        let server = LiveReloadServer::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let url = format!("ws://{}/livereload", server.local_addr());

        let (mut ws, _) = tungstenite::connect(url).unwrap();
        ws.send(Message::Text(
            r#"{"command":"hello","protocols":["http://livereload.com/protocols/official-7"]}"#
                .to_string(),
        ))
        .unwrap();

        let hello = read_text(&mut ws);
        assert!(hello.contains(r#""command":"hello""#), "got: {hello}");

        assert!(wait_for(|| server.client_count() == 1));
        assert_eq!(server.reload("css/site-sass-out.css.twig"), 1);

        let reload = read_text(&mut ws);
        assert!(reload.contains(r#""command":"reload""#), "got: {reload}");
        assert!(reload.contains("css/site-sass-out.css.twig"));
    }

    #[test]
    fn disconnected_clients_are_pruned() {
        let server = LiveReloadServer::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let url = format!("ws://{}/livereload", server.local_addr());

        {
            let (mut ws, _) = tungstenite::connect(url).unwrap();
            assert!(wait_for(|| server.client_count() == 1));
            ws.close(None).unwrap();
            // drain until the close handshake completes
            while ws.read().is_ok() {}
        }

        assert!(wait_for(|| server.reload("a.css") == 0));
    }

    #[test]
    fn bind_conflict_is_reported() {
        let first = LiveReloadServer::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let err = LiveReloadServer::bind(first.local_addr()).err().unwrap();
        assert!(matches!(err, StyleSyncError::LiveReload { .. }));
    }
}
