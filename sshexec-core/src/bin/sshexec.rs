//! CI step entry point: read step inputs, run the command, report.

use std::process::ExitCode;

use anyhow::Context;
use sshexec_core::exec::{self, ConsoleSink, ExecOptions};
use sshexec_core::inputs::ActionInputs;
use sshexec_core::report::{self, Verdict};
use sshexec_core::ssh::SshSession;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => return Verdict::setup_failed(format!("{:#}", e)).conclude(),
    };
    runtime.block_on(run()).conclude()
}

fn build_runtime() -> Result<tokio::runtime::Runtime, anyhow::Error> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
}

async fn run() -> Verdict {
    let inputs = match ActionInputs::from_env() {
        Ok(inputs) => inputs,
        Err(e) => return Verdict::setup_failed(e.to_string()),
    };
    let (config, request) = inputs.into_parts();
    let host = config.host.clone();

    let mut session = SshSession::new(config);
    if let Err(e) = session.connect().await {
        log::error!("Couldn't connect to {}: {}", host, e);
        return Verdict::setup_failed(e.to_string());
    }

    let outcome = exec::execute(
        &mut session,
        &request,
        &mut ConsoleSink,
        &ExecOptions::default(),
    )
    .await;

    let verdict = report::report(request.command(), &outcome);
    if verdict.is_success() {
        if let Err(e) = session.disconnect().await {
            log::warn!("Error while closing session: {}", e);
        }
    }
    verdict
}
