//! Remote command execution.
//!
//! A command is classified once, then run either in the foreground (wait for
//! the exit status) or in the background (stop waiting once output goes
//! idle and disown the job).

pub mod classify;
pub mod engine;
pub mod idle;

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::ssh::SshError;

pub use classify::{classify, CommandRequest, ExecutionMode};
pub use engine::{execute, run_background, run_foreground};

/// How long background output may stay quiet before the process is
/// considered started.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// One event from a running remote command.
#[derive(Debug)]
pub enum ExecEvent {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    /// Exit status reported by the remote shell.
    Exit(u32),
    /// The remote process was killed by a signal.
    Signal(String),
    /// The channel failed underneath the command.
    Error(SshError),
}

/// Events of one remote command, in arrival order per stream.
///
/// The stream ends when the remote channel closes. Dropping it stops the
/// task pumping the channel.
pub struct ExecStream {
    events: mpsc::UnboundedReceiver<ExecEvent>,
    pump: Option<JoinHandle<()>>,
}

impl ExecStream {
    pub fn new(events: mpsc::UnboundedReceiver<ExecEvent>, pump: Option<JoinHandle<()>>) -> Self {
        Self { events, pump }
    }

    /// Next event, or `None` once the channel has closed.
    pub async fn next(&mut self) -> Option<ExecEvent> {
        self.events.recv().await
    }

    /// Consume the rest of the stream, returning the exit status if one was
    /// reported.
    pub async fn drain(mut self) -> Result<Option<u32>, SshError> {
        let mut status = None;
        while let Some(event) = self.next().await {
            match event {
                ExecEvent::Exit(code) => status = Some(code),
                ExecEvent::Error(e) => return Err(e),
                _ => {}
            }
        }
        Ok(status)
    }
}

impl Drop for ExecStream {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

/// The capabilities the engine needs from a connected session.
#[async_trait]
pub trait RemoteShell: Send {
    /// Start `command` and stream its events.
    async fn exec(&mut self, command: &str) -> Result<ExecStream, SshError>;

    fn is_connected(&self) -> bool;

    /// Close the session. Closing twice is a no-op.
    async fn close(&mut self) -> Result<(), SshError>;
}

/// Which remote stream a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Destination for remote output.
pub trait OutputSink: Send {
    fn chunk(&mut self, stream: OutputStream, data: &[u8]);
}

/// Writes remote output to our stdout, both streams combined.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn chunk(&mut self, _stream: OutputStream, data: &[u8]) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(data).and_then(|_| out.flush()) {
            log::debug!("Dropping remote output: {}", e);
        }
    }
}

/// Final result of running one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Completed { exit_code: u32 },
    /// Background process presumed started; nobody waits for its exit.
    Detached,
    Failed { reason: String },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ExecutionOutcome::Completed { exit_code: 0 } | ExecutionOutcome::Detached
        )
    }

    /// Message reported to the host for unsuccessful outcomes.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            ExecutionOutcome::Completed { exit_code: 0 } | ExecutionOutcome::Detached => None,
            ExecutionOutcome::Completed { exit_code } => {
                Some(format!("Command exited with code {}", exit_code))
            }
            ExecutionOutcome::Failed { reason } => Some(reason.clone()),
        }
    }
}

impl From<SshError> for ExecutionOutcome {
    fn from(e: SshError) -> Self {
        ExecutionOutcome::Failed {
            reason: e.to_string(),
        }
    }
}

/// Tunables for the execution engine.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    pub idle_timeout: Duration,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}
