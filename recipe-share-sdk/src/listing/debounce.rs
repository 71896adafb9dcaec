//! Trailing-edge debouncer

use tokio::time::{Duration, Instant};

/// Holds at most one pending value until a quiet period has passed.
///
/// Pushing again inside the window replaces the value and restarts the
/// window. The caller owns the timer: it sleeps until [`deadline`](Self::deadline)
/// and then calls [`take_due`](Self::take_due).
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `value`, returning the value it superseded
    pub fn push(&mut self, value: T) -> Option<T> {
        self.push_at(value, Instant::now())
    }

    pub fn push_at(&mut self, value: T, now: Instant) -> Option<T> {
        self.pending
            .replace((value, now + self.window))
            .map(|(superseded, _)| superseded)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value once its deadline has been reached
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}
