//! Chat connection, login handshake and the blocking receive loop.

use std::{
    io::{self, ErrorKind, Read, Write},
    net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU8, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    domain::{
        SessionConfig,
        chat_line::{ChatLine, parse_line, pong_reply},
    },
    infrastructure::error::SessionError,
    usecase::JoinParticipantUseCase,
};

use super::framer::LineFramer;

pub const DEFAULT_CHAT_HOST: &str = "irc.chat.twitch.tv";
pub const DEFAULT_CHAT_PORT: u16 = 6667;

/// Read timeout of the receive loop. Bounds how long a shutdown request waits.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_millis(200);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_BUFFER_SIZE: usize = 1024;
const THREAD_NAME: &str = "chat-session";

/// Address of the chat server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatServer {
    pub host: String,
    pub port: u16,
}

impl ChatServer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for ChatServer {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_HOST, DEFAULT_CHAT_PORT)
    }
}

/// Lifecycle of a chat session. [`SessionState::Closed`] is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Disconnected = 0,
    Connecting = 1,
    LoggedIn = 2,
    Receiving = 3,
    Closed = 4,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::LoggedIn,
            3 => Self::Receiving,
            4 => Self::Closed,
            _ => Self::Disconnected,
        }
    }
}

/// Session state shared between the receive thread and its owner.
#[derive(Debug, Clone)]
struct StatusCell(Arc<AtomicU8>);

impl StatusCell {
    fn new(state: SessionState) -> Self {
        Self(Arc::new(AtomicU8::new(state as u8)))
    }

    fn get(&self) -> SessionState {
        SessionState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: SessionState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Why the receive loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The running flag was cleared
    Shutdown,
    /// The server closed the connection
    Disconnected,
    /// A read or a keepalive reply failed
    Failed(ErrorKind),
}

/// Write one line followed by the protocol terminator.
pub fn send_line<W: Write>(out: &mut W, line: &str) -> io::Result<()> {
    out.write_all(format!("{}\r\n", line).as_bytes())?;
    out.flush()
}

/// Send the three login lines: credential, identity, room.
pub fn send_handshake<W: Write>(out: &mut W, config: &SessionConfig) -> io::Result<()> {
    send_line(out, &format!("PASS {}", config.auth_token))?;
    send_line(out, &format!("NICK {}", config.nickname))?;
    send_line(out, &format!("JOIN {}", config.room))
}

/// Handle one inbound line: answer keepalives and hand messages to the join use case.
///
/// Lines that are neither are dropped.
pub fn handle_line<W: Write>(
    line: &str,
    out: &mut W,
    join: &JoinParticipantUseCase,
) -> io::Result<()> {
    tracing::debug!("< {}", line);

    match parse_line(line) {
        ChatLine::Ping { payload } => send_line(out, &pong_reply(payload)),
        ChatLine::Message { sender, text } => {
            join.execute(sender, text);
            Ok(())
        }
        ChatLine::Other => Ok(()),
    }
}

/// Read, frame and handle lines until `running` is cleared or the connection ends.
///
/// Timeouts and interrupted reads only re-check `running`.
pub fn receive_loop<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    running: &AtomicBool,
    join: &JoinParticipantUseCase,
) -> LoopExit {
    let mut framer = LineFramer::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];

    while running.load(Ordering::Acquire) {
        let read = match reader.read(&mut buffer) {
            Ok(0) => return LoopExit::Disconnected,
            Ok(read) => read,
            Err(e) if is_retryable(e.kind()) => continue,
            Err(e) => {
                tracing::error!("Chat receive failed: {}", e);
                return LoopExit::Failed(e.kind());
            }
        };

        framer.push(&buffer[..read]);
        while let Some(line) = framer.next_line() {
            if let Err(e) = handle_line(&line, writer, join) {
                tracing::error!("Failed to send keepalive reply: {}", e);
                return LoopExit::Failed(e.kind());
            }
        }
    }

    LoopExit::Shutdown
}

fn is_retryable(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
    )
}

fn connect(server: &ChatServer) -> Result<TcpStream, SessionError> {
    let addrs: Vec<SocketAddr> = (server.host.as_str(), server.port)
        .to_socket_addrs()
        .map_err(|source| SessionError::Resolve {
            host: server.host.clone(),
            port: server.port,
            source,
        })?
        .collect();

    let mut last_error = None;
    for addr in &addrs {
        match TcpStream::connect_timeout(addr, CONNECT_TIMEOUT) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Could not connect to {}: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    Err(match last_error {
        Some(source) => SessionError::Connect {
            host: server.host.clone(),
            port: server.port,
            source,
        },
        None => SessionError::NoAddress {
            host: server.host.clone(),
            port: server.port,
        },
    })
}

/// A running chat session.
///
/// Owns the receive thread. Dropping the session (or calling [`ChatSession::shutdown`])
/// clears the running flag and joins the thread, which takes up to one
/// [`RECEIVE_TIMEOUT`].
#[derive(Debug)]
pub struct ChatSession {
    running: Arc<AtomicBool>,
    status: StatusCell,
    handle: Option<JoinHandle<()>>,
}

impl ChatSession {
    /// Connect, log in and start the receive thread.
    ///
    /// # Errors
    ///
    /// - [`SessionError::IncompleteConfig`] before any network activity if a config field
    ///   is empty
    /// - [`SessionError::Resolve`], [`SessionError::NoAddress`] or [`SessionError::Connect`]
    ///   when no connection could be opened
    /// - [`SessionError::Handshake`] when a login line could not be sent
    /// - [`SessionError::Spawn`] when the receive thread could not be started
    pub fn start(
        config: &SessionConfig,
        server: &ChatServer,
        join: JoinParticipantUseCase,
    ) -> Result<Self, SessionError> {
        if !config.is_complete() {
            return Err(SessionError::IncompleteConfig);
        }

        let status = StatusCell::new(SessionState::Connecting);
        tracing::info!("Connecting to {}:{}", server.host, server.port);
        let stream = connect(server)?;

        if let Err(e) = stream.set_read_timeout(Some(RECEIVE_TIMEOUT)) {
            tracing::warn!("Could not set receive timeout: {}", e);
        }

        if let Err(e) = send_handshake(&mut &stream, config) {
            let _ = stream.shutdown(Shutdown::Both);
            return Err(SessionError::Handshake(e));
        }
        status.set(SessionState::LoggedIn);
        tracing::info!("Logged in as {} joining {}", config.nickname, config.room);

        let running = Arc::new(AtomicBool::new(true));
        let thread_running = running.clone();
        let thread_status = status.clone();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                thread_status.set(SessionState::Receiving);
                let exit = receive_loop(&mut &stream, &mut &stream, &thread_running, &join);
                match exit {
                    LoopExit::Shutdown => tracing::info!("Chat session stopped"),
                    LoopExit::Disconnected => tracing::warn!("Chat server closed the connection"),
                    LoopExit::Failed(kind) => tracing::error!("Chat session ended ({:?})", kind),
                }
                let _ = stream.shutdown(Shutdown::Both);
                thread_status.set(SessionState::Closed);
            })
            .map_err(SessionError::Spawn)?;

        Ok(Self {
            running,
            status,
            handle: Some(handle),
        })
    }

    pub fn status(&self) -> SessionState {
        self.status.get()
    }

    /// `true` once the receive thread has returned.
    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .is_none_or(|handle| handle.is_finished())
    }

    /// Stop the receive loop and wait for the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("Chat session thread panicked");
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.stop();
    }
}
