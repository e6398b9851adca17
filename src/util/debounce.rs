use leptos::prelude::*;
use leptos_dom::helpers::{set_timeout_with_handle, TimeoutHandle};
use std::time::Duration;

/// Trailing-edge debounce over an explicit clock (milliseconds).
///
/// `push` records the latest value and restarts the quiet window; `poll` hands the
/// value out once the window has elapsed since the last push.
#[derive(Clone, Debug)]
pub(crate) struct Debounce<T> {
    interval_ms: i64,
    pending: Option<(T, i64)>,
}

impl<T> Debounce<T> {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms,
            pending: None,
        }
    }

    /// Returns the deadline at which the value becomes due.
    pub fn push(&mut self, value: T, now_ms: i64) -> i64 {
        let due = now_ms + self.interval_ms;
        self.pending = Some((value, due));
        due
    }

    pub fn poll(&mut self, now_ms: i64) -> Option<T> {
        let due = self.pending.as_ref().map(|(_, due)| *due)?;
        if now_ms >= due {
            self.pending.take().map(|(v, _)| v)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Deadline of the pending value, if any.
    pub fn due(&self) -> Option<i64> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Browser timer slot: scheduling replaces whatever was scheduled before.
#[derive(Clone, Copy)]
pub(crate) struct DebounceTimer {
    handle: StoredValue<Option<TimeoutHandle>>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self {
            handle: StoredValue::new(None),
        }
    }

    pub fn schedule(&self, delay: Duration, cb: impl FnOnce() + 'static) {
        self.cancel();
        match set_timeout_with_handle(cb, delay) {
            Ok(h) => {
                self.handle.try_set_value(Some(h));
            }
            Err(e) => tracing::warn!(error = ?e, "failed to schedule timer"),
        }
    }

    pub fn cancel(&self) {
        if let Some(h) = self.handle.try_update_value(|h| h.take()).flatten() {
            h.clear();
        }
    }
}
