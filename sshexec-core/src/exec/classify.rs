//! Foreground/background selection.
//!
//! A command ending in `" &"` asks the remote shell to background it. We
//! treat that suffix as a hint that the process is meant to keep running
//! after we leave, so we must not wait for it to exit. The suffix stays in
//! the command text; the remote shell does the actual backgrounding.

/// Suffix that marks a detached command.
const DETACH_MARKER: &str = " &";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Wait for the process to exit and report its status.
    Foreground,
    /// Stop waiting once output goes idle, then disown the job.
    Background,
}

/// A command and the mode it will run in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    command: String,
    mode: ExecutionMode,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        let (mode, _) = classify(&command);
        Self { command, mode }
    }

    /// Command text as sent to the remote shell.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }
}

/// Pick the execution mode for `command`.
///
/// Only the exact `" &"` suffix selects [`ExecutionMode::Background`]:
/// `"a && b"`, `"cmd&"` and `"cmd &&"` all stay in the foreground. The
/// returned command text is `command` unchanged.
pub fn classify(command: &str) -> (ExecutionMode, &str) {
    let mode = if command.ends_with(DETACH_MARKER) {
        ExecutionMode::Background
    } else {
        ExecutionMode::Foreground
    };
    (mode, command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_command_is_foreground() {
        assert_eq!(classify("echo hi").0, ExecutionMode::Foreground);
        assert_eq!(classify("false").0, ExecutionMode::Foreground);
        assert_eq!(classify("").0, ExecutionMode::Foreground);
    }

    #[test]
    fn test_trailing_marker_is_background() {
        let (mode, cmd) = classify("sleep 100 &");
        assert_eq!(mode, ExecutionMode::Background);
        assert_eq!(cmd, "sleep 100 &");
    }

    #[test]
    fn test_near_misses_stay_foreground() {
        for cmd in [
            "make && make install",
            "sleep 100&",
            "sleep 100 &&",
            "a & b",
            "sleep 100 & ",
            "sleep 100\t&",
        ] {
            assert_eq!(classify(cmd).0, ExecutionMode::Foreground, "{:?}", cmd);
        }
    }

    #[test]
    fn test_request_keeps_marker() {
        let request = CommandRequest::new("./server --port 8080 &");
        assert_eq!(request.mode(), ExecutionMode::Background);
        assert_eq!(request.command(), "./server --port 8080 &");
    }

    proptest! {
        #[test]
        fn prop_suffix_selects_background(body in "[a-z0-9 ./-]{0,40}[a-z0-9]") {
            let background = format!("{} &", body);
            prop_assert_eq!(classify(&background).0, ExecutionMode::Background);
            prop_assert_eq!(classify(&body).0, ExecutionMode::Foreground);
        }

        #[test]
        fn prop_embedded_ampersand_is_foreground(
            head in "[a-z ]{0,20}",
            tail in "[a-z0-9]{1,20}",
        ) {
            let cmd = format!("{} & {}", head, tail);
            prop_assert_eq!(classify(&cmd).0, ExecutionMode::Foreground);
        }
    }
}
