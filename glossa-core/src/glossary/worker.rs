//! Background worker
//!
//! Runs one job on its own thread and streams its progress back over a bounded
//! channel. The caller polls the handle with a timeout and stays responsive while the
//! job runs. There is no cancellation: a started job runs to completion.

use crate::glossary::error::{GlossaryError, GlossaryResult};
use crate::glossary::progress::{to_percent, ProgressEvent, ProgressSink};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Pending messages before the worker blocks on `send`.
const CHANNEL_CAPACITY: usize = 64;

/// What the worker sends to the front end.
#[derive(Debug)]
pub enum WorkerMessage<T> {
    Progress(ProgressEvent),
    Warning(String),
    /// Always the last message of a job.
    Finished(GlossaryResult<T>),
}

/// Progress sink handed to the job. Percentages are clamped and never decrease.
pub struct ProgressReporter<T> {
    sender: SyncSender<WorkerMessage<T>>,
    last: AtomicU8,
}

impl<T> ProgressReporter<T> {
    fn new(sender: SyncSender<WorkerMessage<T>>) -> Self {
        Self {
            sender,
            last: AtomicU8::new(0),
        }
    }
}

impl<T: Send> ProgressSink for ProgressReporter<T> {
    fn report(&self, percent: f32, message: &str) {
        let percent = to_percent(percent);
        let previous = self.last.fetch_max(percent, Ordering::Relaxed);
        let event = ProgressEvent::new(percent.max(previous), message);
        // A closed channel means nobody is listening any more.
        let _ = self.sender.send(WorkerMessage::Progress(event));
    }

    fn warn(&self, message: &str) {
        let _ = self.sender.send(WorkerMessage::Warning(message.to_string()));
    }
}

/// Result of one poll.
#[derive(Debug)]
pub enum Poll<T> {
    Message(WorkerMessage<T>),
    /// Nothing arrived within the timeout.
    Pending,
}

/// Front-end side of a running job.
pub struct WorkerHandle<T> {
    receiver: Receiver<WorkerMessage<T>>,
    thread: Option<JoinHandle<()>>,
    finished: bool,
}

impl<T> WorkerHandle<T> {
    /// Wait up to `timeout` for the next message.
    ///
    /// When the worker thread dies without a `Finished` message, a synthetic
    /// `Finished(Err(WorkerLost))` is returned once.
    pub fn poll(&mut self, timeout: Duration) -> Poll<T> {
        if self.finished {
            return Poll::Pending;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(message) => {
                if matches!(message, WorkerMessage::Finished(_)) {
                    self.finished = true;
                    self.join();
                }
                Poll::Message(message)
            }
            Err(RecvTimeoutError::Timeout) => Poll::Pending,
            Err(RecvTimeoutError::Disconnected) => {
                self.finished = true;
                self.join();
                Poll::Message(WorkerMessage::Finished(Err(GlossaryError::WorkerLost)))
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Poll until the job finishes, passing every progress event and warning to `sink`.
    pub fn wait(mut self, interval: Duration, sink: &dyn ProgressSink) -> GlossaryResult<T> {
        loop {
            match self.poll(interval) {
                Poll::Pending => continue,
                Poll::Message(WorkerMessage::Progress(event)) => {
                    sink.report(f32::from(event.percent), &event.message)
                }
                Poll::Message(WorkerMessage::Warning(warning)) => sink.warn(&warning),
                Poll::Message(WorkerMessage::Finished(result)) => return result,
            }
        }
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                debug!("worker thread panicked");
            }
        }
    }
}

/// Start `job` on a background thread.
pub fn spawn<T, F>(job: F) -> WorkerHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&ProgressReporter<T>) -> GlossaryResult<T> + Send + 'static,
{
    let (sender, receiver) = mpsc::sync_channel(CHANNEL_CAPACITY);
    let thread = thread::spawn(move || {
        let reporter = ProgressReporter::new(sender.clone());
        let result = job(&reporter);
        let _ = sender.send(WorkerMessage::Finished(result));
    });
    WorkerHandle {
        receiver,
        thread: Some(thread),
        finished: false,
    }
}
