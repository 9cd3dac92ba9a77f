//! Error types of the infrastructure layer.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Config file errors. Non-fatal: the wheel runs without chat ingestion.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Could not open config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Chat session errors. Fatal to the session only; there is no reconnect.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Credential, nick or room is missing
    #[error("Config not set; skipping chat integration")]
    IncompleteConfig,

    /// The chat host could not be resolved
    #[error("Could not resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Resolution returned no addresses
    #[error("No address found for {host}:{port}")]
    NoAddress { host: String, port: u16 },

    /// Every resolved address refused or timed out
    #[error("Could not connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// A login line could not be sent
    #[error("Failed to send login messages: {0}")]
    Handshake(#[source] io::Error),

    /// The receive thread could not be started
    #[error("Failed to spawn chat thread: {0}")]
    Spawn(#[source] io::Error),
}
