//! sshexec core: run one shell command on a remote host over SSH and report
//! the result to a CI runner.
//!
//! A command ending in `" &"` is treated as long-running: output is streamed
//! until it goes quiet, then the job is disowned and the session released
//! instead of waiting for an exit that may never come.

pub mod exec;
pub mod inputs;
pub mod report;
pub mod ssh;
