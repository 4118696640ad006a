//! Logging filter for call observation.

use interpose_core::{Filter, Next};
use std::borrow::Cow;
use std::fmt::Debug;

/// A filter that logs each call and its result, then passes both through.
///
/// Emits a `calling` event before forwarding and a `returned` event after,
/// at `debug` level unless [`LoggingFilter::with_level`] picks another one.
/// Without the `tracing` feature it is a plain pass-through.
///
/// # Example
///
/// ```rust,ignore
/// let verbose = LoggingFilter::new("greet");
/// let audit = LoggingFilter::new("save").with_level(tracing::Level::INFO);
/// ```
#[derive(Debug, Clone)]
pub struct LoggingFilter {
    label: Cow<'static, str>,
    #[cfg(feature = "tracing")]
    level: tracing::Level,
}

impl LoggingFilter {
    /// Create a logging filter; `label` names the call in every event.
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            #[cfg(feature = "tracing")]
            level: tracing::Level::DEBUG,
        }
    }

    /// Emit events at `level` instead of `debug`.
    #[cfg(feature = "tracing")]
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    /// The label attached to emitted events.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The level events are emitted at.
    #[cfg(feature = "tracing")]
    pub fn level(&self) -> tracing::Level {
        self.level
    }
}

// `tracing` macros need the level as a constant, so each one gets its own branch.
#[cfg(feature = "tracing")]
macro_rules! event_at {
    ($level:expr, $($field:tt)+) => {{
        let level = $level;
        if level == tracing::Level::ERROR {
            tracing::error!($($field)+)
        } else if level == tracing::Level::WARN {
            tracing::warn!($($field)+)
        } else if level == tracing::Level::INFO {
            tracing::info!($($field)+)
        } else if level == tracing::Level::DEBUG {
            tracing::debug!($($field)+)
        } else {
            tracing::trace!($($field)+)
        }
    }};
}

impl<C, A: Debug, R: Debug> Filter<C, A, R> for LoggingFilter {
    fn apply(&self, _ctx: &C, args: A, next: Next<'_, C, A, R>) -> R {
        #[cfg(feature = "tracing")]
        event_at!(self.level, call = %self.label, ?args, "calling");

        let result = next.run(args);

        #[cfg(feature = "tracing")]
        event_at!(self.level, call = %self.label, ?result, "returned");

        result
    }
}
