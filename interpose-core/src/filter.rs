//! # Filter Layer
//!
//! Filters are the interceptors wrapped around a slot's original callable.
//! Each one receives the invocation context, the current arguments, and a
//! [`Next`] continuation. Calling [`Next::run`] hands control to the next
//! enabled filter (or the original target once none are left); returning
//! without calling it short-circuits the chain.
//!
//! Filters run in reverse attachment order: the most recently attached
//! filter sees the call first, the original target sees it last.
//!
//! # Use Cases
//!
//! - Observing calls (logging, counting, timing)
//! - Rewriting arguments before the original sees them
//! - Decorating or replacing return values
//! - Guarding a method behind a precondition

use crate::chain::FilterEntry;
use crate::target::Target;
use std::fmt;
use std::sync::Arc;

/// An interceptor around a slot's callable.
///
/// # Example
///
/// ```rust,ignore
/// struct Shout;
///
/// impl Filter<(), String, String> for Shout {
///     fn apply(&self, _ctx: &(), args: String, next: Next<'_, (), String, String>) -> String {
///         next.run(args).to_uppercase()
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Filter<{C}, {A}, {R}>`",
    label = "missing `Filter` implementation",
    note = "Closures of shape `Fn(&C, A, Next<'_, C, A, R>) -> R` can be wrapped with `FilterFn::new`."
)]
pub trait Filter<C, A, R>: Send + Sync {
    /// Intercept one invocation.
    fn apply(&self, ctx: &C, args: A, next: Next<'_, C, A, R>) -> R;
}

/// Adapter turning a closure into a [`Filter`].
#[derive(Clone)]
pub struct FilterFn<F> {
    func: F,
}

impl<F> FilterFn<F> {
    /// Wrap a closure.
    pub fn new<C, A, R>(func: F) -> Self
    where
        F: for<'a> Fn(&'a C, A, Next<'a, C, A, R>) -> R + Send + Sync,
    {
        Self { func }
    }
}

impl<F> fmt::Debug for FilterFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterFn").finish_non_exhaustive()
    }
}

impl<C, A, R, F> Filter<C, A, R> for FilterFn<F>
where
    F: for<'a> Fn(&'a C, A, Next<'a, C, A, R>) -> R + Send + Sync,
{
    fn apply(&self, ctx: &C, args: A, next: Next<'_, C, A, R>) -> R {
        (self.func)(ctx, args, next)
    }
}

impl<C, A, R, T> Filter<C, A, R> for Box<T>
where
    T: Filter<C, A, R> + ?Sized,
{
    fn apply(&self, ctx: &C, args: A, next: Next<'_, C, A, R>) -> R {
        (**self).apply(ctx, args, next)
    }
}

/// The continuation handed to a filter.
///
/// Holds the part of the chain below the current filter. Consumed by
/// [`Next::run`], so each filter continues the chain at most once per call.
pub struct Next<'a, C, A, R> {
    ctx: &'a C,
    remaining: &'a [Arc<FilterEntry<C, A, R>>],
    target: &'a dyn Target<C, A, R>,
}

impl<'a, C, A, R> Next<'a, C, A, R> {
    /// Start a traversal over `entries` (attachment order) ending at `target`.
    pub fn new(
        ctx: &'a C,
        entries: &'a [Arc<FilterEntry<C, A, R>>],
        target: &'a dyn Target<C, A, R>,
    ) -> Self {
        Self {
            ctx,
            remaining: entries,
            target,
        }
    }

    /// Continue the chain with `args`.
    ///
    /// Skips disabled entries, calls the nearest enabled filter below the
    /// current one, or the original target when none is left.
    pub fn run(self, args: A) -> R {
        let mut remaining = self.remaining;
        while let Some((entry, rest)) = remaining.split_last() {
            if entry.is_enabled() {
                let next = Next {
                    ctx: self.ctx,
                    remaining: rest,
                    target: self.target,
                };
                return entry.filter().apply(self.ctx, args, next);
            }
            remaining = rest;
        }
        self.target.invoke(self.ctx, args)
    }

    /// The invocation context.
    pub fn ctx(&self) -> &'a C {
        self.ctx
    }

    /// Number of enabled filters still ahead of the original target.
    pub fn pending(&self) -> usize {
        self.remaining.iter().filter(|e| e.is_enabled()).count()
    }
}

impl<C, A, R> fmt::Debug for Next<'_, C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.remaining.len())
            .finish_non_exhaustive()
    }
}
