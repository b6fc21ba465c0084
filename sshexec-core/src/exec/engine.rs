use super::idle::IdleWatch;
use super::{
    CommandRequest, ExecEvent, ExecOptions, ExecStream, ExecutionMode, ExecutionOutcome,
    OutputSink, OutputStream, RemoteShell,
};

/// Command issued after a background process has gone quiet, so the job
/// survives the session closing.
const DISOWN_COMMAND: &str = "disown";

/// Run `request` in the mode chosen for it.
pub async fn execute<S>(
    shell: &mut S,
    request: &CommandRequest,
    sink: &mut dyn OutputSink,
    options: &ExecOptions,
) -> ExecutionOutcome
where
    S: RemoteShell + ?Sized,
{
    log::info!("Executing command: {}", request.command());
    match request.mode() {
        ExecutionMode::Foreground => run_foreground(shell, request.command(), sink).await,
        ExecutionMode::Background => {
            run_background(shell, request.command(), sink, options).await
        }
    }
}

/// Run `command` and wait for it to exit.
///
/// On success the session is closed straight away.
pub async fn run_foreground<S>(
    shell: &mut S,
    command: &str,
    sink: &mut dyn OutputSink,
) -> ExecutionOutcome
where
    S: RemoteShell + ?Sized,
{
    let mut stream = match shell.exec(command).await {
        Ok(stream) => stream,
        Err(e) => return e.into(),
    };

    let mut exit = Exit::default();
    while let Some(event) = stream.next().await {
        if let Some(failure) = exit.observe(event, sink) {
            return failure;
        }
    }

    let outcome = exit.into_outcome();
    if outcome.is_success() {
        log::info!("Command finished.");
        close_if_connected(shell).await;
    }
    outcome
}

/// Run a long-lived `command` without waiting for it to exit.
///
/// Output is streamed until it goes quiet for `options.idle_timeout`; the
/// job is then disowned and the session closed. If the command finishes
/// before that, its exit status decides the outcome like in the foreground.
pub async fn run_background<S>(
    shell: &mut S,
    command: &str,
    sink: &mut dyn OutputSink,
    options: &ExecOptions,
) -> ExecutionOutcome
where
    S: RemoteShell + ?Sized,
{
    log::info!("Command seems to be a long running process");

    let mut stream = match shell.exec(command).await {
        Ok(stream) => stream,
        Err(e) => return e.into(),
    };

    let mut idle = IdleWatch::start(options.idle_timeout);
    let mut exit = Exit::default();
    let resolution = loop {
        tokio::select! {
            _ = idle.elapsed() => break Resolution::WentIdle,
            event = stream.next() => match event {
                Some(event) => {
                    if matches!(event, ExecEvent::Stdout(_) | ExecEvent::Stderr(_)) {
                        idle.rearm();
                    }
                    if let Some(failure) = exit.observe(event, sink) {
                        break Resolution::Finished(failure);
                    }
                }
                None => break Resolution::Finished(std::mem::take(&mut exit).into_outcome()),
            },
        }
    };
    idle.cancel();

    match resolution {
        Resolution::WentIdle => {
            log::info!("Received feedback from the terminal. Process seems to be started.");
            detach(shell, stream).await;
            ExecutionOutcome::Detached
        }
        Resolution::Finished(outcome) => {
            log::info!("Background command returned before going idle.");
            if outcome.is_success() {
                close_if_connected(shell).await;
            }
            outcome
        }
    }
}

/// Which of the two competing background events happened first.
enum Resolution {
    WentIdle,
    Finished(ExecutionOutcome),
}

/// Disown the job, then let go of the session. The launch stream is
/// dropped only after the session is gone.
async fn detach<S>(shell: &mut S, launched: ExecStream)
where
    S: RemoteShell + ?Sized,
{
    match shell.exec(DISOWN_COMMAND).await {
        Ok(stream) => {
            if let Err(e) = stream.drain().await {
                log::warn!("disown did not complete cleanly: {}", e);
            }
        }
        Err(e) => log::warn!("Could not issue disown: {}", e),
    }
    close_if_connected(shell).await;
    drop(launched);
}

async fn close_if_connected<S>(shell: &mut S)
where
    S: RemoteShell + ?Sized,
{
    if !shell.is_connected() {
        return;
    }
    if let Err(e) = shell.close().await {
        log::warn!("Error while closing session: {}", e);
    }
}

/// Exit information gathered while a command streams.
#[derive(Default)]
struct Exit {
    status: Option<u32>,
    signal: Option<String>,
}

impl Exit {
    /// Forward output to `sink` and record exit details. Returns an outcome
    /// when the event ends the command abnormally.
    fn observe(
        &mut self,
        event: ExecEvent,
        sink: &mut dyn OutputSink,
    ) -> Option<ExecutionOutcome> {
        match event {
            ExecEvent::Stdout(data) => sink.chunk(OutputStream::Stdout, &data),
            ExecEvent::Stderr(data) => sink.chunk(OutputStream::Stderr, &data),
            ExecEvent::Exit(code) => self.status = Some(code),
            ExecEvent::Signal(name) => self.signal = Some(name),
            ExecEvent::Error(e) => return Some(e.into()),
        }
        None
    }

    fn into_outcome(self) -> ExecutionOutcome {
        match (self.status, self.signal) {
            (Some(exit_code), _) => ExecutionOutcome::Completed { exit_code },
            (None, Some(signal)) => ExecutionOutcome::Failed {
                reason: format!("Command terminated by signal {}", signal),
            },
            (None, None) => ExecutionOutcome::Failed {
                reason: "Channel closed before the command reported an exit status".to_string(),
            },
        }
    }
}
