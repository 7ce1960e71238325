use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

// ---------------------------------------------------------------------------
// Background worker: one thread per user action
// ---------------------------------------------------------------------------

/// Handle to a job running on its own thread. Poll it once per frame.
pub struct Worker<T> {
    rx: Receiver<T>,
}

impl<T: Send + 'static> Worker<T> {
    /// Run `job` on a new named thread; `notify` fires after the result is sent
    /// (the UI passes a repaint request here).
    pub fn spawn<F, N>(name: &str, job: F, notify: N) -> std::io::Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
        N: FnOnce() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new().name(name.to_string()).spawn(move || {
            let result = job();
            // The receiver is gone only if the window closed mid-job.
            let _ = tx.send(result);
            notify();
        })?;
        Ok(Self { rx })
    }

    /// Non-blocking check for the job's result.
    pub fn poll(&self) -> Poll<T> {
        match self.rx.try_recv() {
            Ok(result) => Poll::Ready(result),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Lost,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Poll<T> {
    Pending,
    Ready(T),
    /// The thread ended without sending (it panicked).
    Lost,
}
