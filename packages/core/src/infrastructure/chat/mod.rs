//! Chat session over the IRC-style chat protocol.

pub mod framer;
pub mod session;

pub use framer::LineFramer;
pub use session::{
    ChatServer, ChatSession, LoopExit, RECEIVE_TIMEOUT, SessionState, handle_line, receive_loop,
    send_handshake, send_line,
};
