//! Testing utilities for Interpose.
//!
//! Helpers that make chain order and call counts easy to assert on.
//!
//! # Features
//!
//! - [`CallLog`]: A shared, ordered log of labels
//! - [`RecordingFilter`]: A filter that appends its label to a [`CallLog`] and forwards
//! - [`CountingTarget`]: A target that counts invocations and returns a fixed value

use interpose_core::{Filter, Next, Target};
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Call Log
// ============================================================================

/// A shared, ordered log of call labels.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// slot.attach(RecordingFilter::new("outer", &log));
///
/// slot.call(&(), args);
/// assert_eq!(log.entries(), vec!["outer"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label.
    pub fn push(&self, label: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(label.into());
    }

    /// Get a clone of the recorded labels.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the number of recorded labels.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all recorded labels.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

// ============================================================================
// Recording Filter
// ============================================================================

/// A filter that records its label, then forwards the call unchanged.
#[derive(Debug, Clone)]
pub struct RecordingFilter {
    label: String,
    log: CallLog,
}

impl RecordingFilter {
    /// Create a recording filter writing to `log`.
    pub fn new(label: impl Into<String>, log: &CallLog) -> Self {
        Self {
            label: label.into(),
            log: log.clone(),
        }
    }
}

impl<C, A, R> Filter<C, A, R> for RecordingFilter {
    fn apply(&self, _ctx: &C, args: A, next: Next<'_, C, A, R>) -> R {
        self.log.push(self.label.clone());
        next.run(args)
    }
}

// ============================================================================
// Counting Target
// ============================================================================

/// A target that counts invocations and always returns a clone of `value`.
///
/// # Example
///
/// ```rust,ignore
/// let target = CountingTarget::new("ok");
/// let slot = Slot::from_target("op", Arc::new(target.clone()));
///
/// slot.call(&(), ());
/// assert_eq!(target.count(), 1);
/// ```
#[derive(Debug)]
pub struct CountingTarget<R> {
    count: Arc<AtomicUsize>,
    value: R,
}

impl<R> CountingTarget<R> {
    /// Create a counting target returning `value`.
    pub fn new(value: R) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            value,
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<R: Clone> Clone for CountingTarget<R> {
    fn clone(&self) -> Self {
        Self {
            count: Arc::clone(&self.count),
            value: self.value.clone(),
        }
    }
}

impl<C, A, R> Target<C, A, R> for CountingTarget<R>
where
    R: Clone + Send + Sync,
{
    fn invoke(&self, _ctx: &C, _args: A) -> R {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Slot;

    #[test]
    fn test_recording_filter_order() {
        let log = CallLog::new();
        let target = CountingTarget::new(7);
        let slot: Slot<(), (), i32> = Slot::from_target("op", Arc::new(target.clone()));
        slot.attach(RecordingFilter::new("first", &log));
        slot.attach(RecordingFilter::new("second", &log));

        assert_eq!(slot.call(&(), ()), 7);
        assert_eq!(log.entries(), vec!["second", "first"]);
        assert_eq!(target.count(), 1);

        log.clear();
        target.reset();
        assert!(log.is_empty());
        assert_eq!(target.count(), 0);
    }
}
