//! Progress reporting and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Channel between a long-running ordering and whoever drives it.
///
/// The chain builder calls [`Feedback::set_progress`] once per completed step
/// and polls [`Feedback::is_cancelled`] right after each appended point.
pub trait Feedback {
    /// Percent complete, in `(0, 100]`.
    fn set_progress(&mut self, _percent: f64) {}

    fn is_cancelled(&self) -> bool { false }
}

/// Ignores progress and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {}

/// Shared cancellation flag.
///
/// Clones share the same flag, so one handle can be given to another thread
/// (or a signal handler) while the ordering polls the other.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) { self.0.store(true, Ordering::Relaxed) }

    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}

impl Feedback for CancelToken {
    fn is_cancelled(&self) -> bool { CancelToken::is_cancelled(self) }
}

/// Logs progress through `tracing` every 10%, optionally honoring a token.
#[derive(Debug, Default)]
pub struct LogProgress {
    cancel: Option<CancelToken>,
    last_decile: u32,
}

impl LogProgress {
    pub fn new() -> Self { Self::default() }

    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self { cancel: Some(cancel), last_decile: 0 }
    }
}

impl Feedback for LogProgress {
    fn set_progress(&mut self, percent: f64) {
        let decile = (percent / 10.0).floor() as u32;
        if decile > self.last_decile {
            self.last_decile = decile;
            tracing::info!(progress = decile * 10, "ordering points");
        }
        tracing::trace!(percent, "step complete");
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}
