//! Infrastructure layer: concrete registry, config file loading and the chat connection.

pub mod chat;
pub mod config_file;
pub mod error;
pub mod registry;

pub use chat::{ChatServer, ChatSession, SessionState};
pub use config_file::load_session_config;
pub use error::{ConfigError, SessionError};
pub use registry::InMemoryParticipantRegistry;
