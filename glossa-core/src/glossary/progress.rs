//! Progress reporting
//!
//! Long operations report coarse checkpoints as `{percent, message}` events through a
//! [`ProgressSink`]. The core never knows who listens: the worker forwards events over
//! a channel, tests record them, and plain calls use [`NoProgress`].

use std::sync::Mutex;

/// One progress checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub percent: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(percent: u8, message: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            message: message.into(),
        }
    }
}

/// Receiver of progress checkpoints and non-fatal warnings.
pub trait ProgressSink {
    /// Report a checkpoint; `percent` is clamped to `0.0..=100.0` by implementors.
    fn report(&self, percent: f32, message: &str);

    /// Report a problem that does not abort the operation.
    fn warn(&self, _message: &str) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _percent: f32, _message: &str) {}
}

/// Maps `0..=100` of a sub-task onto `start..start + span` of the parent.
pub struct ScaledProgress<'a> {
    inner: &'a dyn ProgressSink,
    start: f32,
    span: f32,
}

impl<'a> ScaledProgress<'a> {
    pub fn new(inner: &'a dyn ProgressSink, start: f32, span: f32) -> Self {
        Self { inner, start, span }
    }
}

impl ProgressSink for ScaledProgress<'_> {
    fn report(&self, percent: f32, message: &str) {
        let local = percent.clamp(0.0, 100.0) / 100.0;
        self.inner.report(self.start + local * self.span, message);
    }

    fn warn(&self, message: &str) {
        self.inner.warn(message);
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, percent: f32, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(ProgressEvent::new(to_percent(percent), message));
        }
    }

    fn warn(&self, message: &str) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(message.to_string());
        }
    }
}

/// Round and clamp a fractional percentage.
pub fn to_percent(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}

/// Whether item `index` of a loop is a checkpoint for a report every `every` items.
pub fn is_checkpoint(index: usize, every: usize) -> bool {
    every == 0 || index % every == 0
}
