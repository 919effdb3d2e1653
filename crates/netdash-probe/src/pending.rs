use anyhow::{anyhow, Context, Result};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Handle to a value a worker thread will deliver once.
///
/// The owner polls it from its own loop; the worker never touches the
/// owner's state.
#[derive(Debug)]
pub struct Pending<T> {
    label: String,
    rx: Receiver<Result<T>>,
}

impl<T> Pending<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `None` while the worker is still running.
    pub fn try_take(&self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(anyhow!(
                "{} worker exited without a result",
                self.label
            ))),
        }
    }

    pub fn wait(self) -> Result<T> {
        self.rx
            .recv()
            .map_err(|_| anyhow!("{} worker exited without a result", self.label))?
    }
}

/// Runs `job` on a named worker thread and hands back its result as a
/// [`Pending`].
pub fn spawn_deferred<T, F>(label: &str, job: F) -> Result<Pending<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(format!("netdash-{label}"))
        .spawn(move || {
            let _ = tx.send(job());
        })
        .with_context(|| format!("failed to spawn {label} worker"))?;

    Ok(Pending {
        label: label.to_string(),
        rx,
    })
}
