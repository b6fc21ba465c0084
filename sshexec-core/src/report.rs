//! Reporting the result of a run to the CI host.
//!
//! The host only sees two signals: a silent success, or a failure carrying a
//! message. Failures during execution abort the process outright so a
//! misbehaving remote command can never leave the step hanging.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use crate::exec::ExecutionOutcome;

/// Environment variable naming the file that receives step outputs.
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// What the process tells its host before exiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failure { message: String, abort: bool },
}

impl Verdict {
    /// Failure before any command ran (bad inputs, unreachable host,
    /// rejected credentials). Exits with status 1.
    pub fn setup_failed(message: impl Into<String>) -> Self {
        Verdict::Failure {
            message: message.into(),
            abort: false,
        }
    }

    /// Verdict for a finished execution. Unsuccessful outcomes abort.
    pub fn from_outcome(outcome: &ExecutionOutcome) -> Self {
        match outcome.failure_message() {
            None => Verdict::Success,
            Some(message) => Verdict::Failure {
                message,
                abort: true,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success)
    }

    /// Emit the verdict and hand back the exit code. Aborting verdicts do not
    /// return.
    pub fn conclude(self) -> ExitCode {
        match self {
            Verdict::Success => {
                log::info!("SSH Action finished.");
                ExitCode::SUCCESS
            }
            Verdict::Failure { message, abort } => {
                log::error!("{}", message);
                println!("::error::{}", escape_data(&message));
                if abort {
                    std::process::abort();
                }
                ExitCode::FAILURE
            }
        }
    }
}

/// Log a failed execution and publish the outcome as a step output.
pub fn report(command: &str, outcome: &ExecutionOutcome) -> Verdict {
    if let Some(message) = outcome.failure_message() {
        log::error!("An error happened executing command {}: {}", command, message);
    }
    if let Some(path) = std::env::var_os(OUTPUT_FILE_ENV) {
        if let Err(e) = publish_outcome(Path::new(&path), outcome) {
            log::warn!("Could not write step output: {}", e);
        }
    }
    Verdict::from_outcome(outcome)
}

/// Append `result=<json>` to the step output file.
pub fn publish_outcome(path: &Path, outcome: &ExecutionOutcome) -> Result<(), anyhow::Error> {
    let json = serde_json::to_string(outcome)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "result={}", json)?;
    Ok(())
}

/// Escape a message for use in a workflow command.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
