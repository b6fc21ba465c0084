use std::io;

use thiserror::Error;

/// Errors raised while connecting to, authenticating against, or running
/// commands on a remote host.
#[derive(Debug, Error)]
pub enum SshError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network-level failure (unreachable host, reset, broken pipe).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("SSH protocol error: {0}")]
    Protocol(String),

    #[error("Key error: {0}")]
    Key(String),

    #[error("Connection timeout after {0}s")]
    Timeout(u64),

    /// The exec channel was refused or dropped mid-execution.
    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Session disconnected: {0}")]
    Disconnected(String),
}

impl SshError {
    /// Whether this is the residue of a peer that already hung up.
    ///
    /// These show up when a session is torn down after its work is done and
    /// are safe to drop on the floor.
    pub fn is_connection_reset(&self) -> bool {
        match self {
            SshError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}

impl From<russh::Error> for SshError {
    fn from(e: russh::Error) -> Self {
        match e {
            russh::Error::IO(io) => SshError::Io(io),
            other => SshError::Protocol(other.to_string()),
        }
    }
}

impl From<russh::keys::Error> for SshError {
    fn from(e: russh::keys::Error) -> Self {
        SshError::Key(e.to_string())
    }
}
