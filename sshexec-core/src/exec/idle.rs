//! Idle-output detection for background commands.
//!
//! The timer lives in its own task. The engine pokes it on every output
//! chunk; the task resets its deadline and, once a full window passes with
//! no pokes, resolves a one-shot channel and exits. It therefore fires at
//! most once. Cancelling aborts the task so no timer outlives the command.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

pub struct IdleWatch {
    activity: mpsc::UnboundedSender<()>,
    fired: Option<oneshot::Receiver<()>>,
    task: JoinHandle<()>,
}

impl IdleWatch {
    /// Arm a watch that fires after `window` without activity.
    pub fn start(window: Duration) -> Self {
        let (activity, mut pokes) = mpsc::unbounded_channel::<()>();
        let (fire, fired) = oneshot::channel();

        let task = tokio::spawn(async move {
            let deadline = sleep(window);
            tokio::pin!(deadline);
            loop {
                tokio::select! {
                    _ = &mut deadline => {
                        let _ = fire.send(());
                        return;
                    }
                    poke = pokes.recv() => match poke {
                        Some(()) => deadline.as_mut().reset(Instant::now() + window),
                        None => return,
                    },
                }
            }
        });

        Self {
            activity,
            fired: Some(fired),
            task,
        }
    }

    /// Push the deadline out by a full window.
    pub fn rearm(&self) {
        let _ = self.activity.send(());
    }

    /// Resolves once, when the window elapses. Afterwards, or if the watch
    /// was cancelled, it never resolves again.
    pub async fn elapsed(&mut self) {
        if let Some(fired) = self.fired.as_mut() {
            let result = fired.await;
            self.fired = None;
            if result.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await
    }

    /// Stop the timer task.
    pub fn cancel(self) {
        self.task.abort();
    }
}
