//! # Target Layer
//!
//! The callable that lives in a slot before anything intercepts it, and the
//! common shape of everything that can be installed there (the original
//! method or a [`Dispatcher`]).
//!
//! The invocation context `C` is passed explicitly on every call. It plays
//! the role of the receiver: the host's state, a request scope, or `()`.
//!
//! [`Dispatcher`]: crate::Dispatcher

use std::fmt;

/// A callable occupying a slot.
///
/// Implemented by [`TargetFn`] for plain closures and by
/// [`Dispatcher`](crate::Dispatcher) for intercepted slots.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be called as `Target<{C}, {A}, {R}>`",
    label = "missing `Target` implementation",
    note = "Wrap closures of shape `Fn(&C, A) -> R` with `TargetFn::new`."
)]
pub trait Target<C, A, R>: Send + Sync {
    /// Call the target with an explicit context and arguments.
    fn invoke(&self, ctx: &C, args: A) -> R;
}

/// Adapter turning a closure `Fn(&C, A) -> R` into a [`Target`].
#[derive(Clone)]
pub struct TargetFn<F> {
    func: F,
}

impl<F> TargetFn<F> {
    /// Wrap a closure.
    pub fn new<C, A, R>(func: F) -> Self
    where
        F: Fn(&C, A) -> R + Send + Sync,
    {
        Self { func }
    }
}

impl<F> fmt::Debug for TargetFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetFn").finish_non_exhaustive()
    }
}

impl<C, A, R, F> Target<C, A, R> for TargetFn<F>
where
    F: Fn(&C, A) -> R + Send + Sync,
{
    fn invoke(&self, ctx: &C, args: A) -> R {
        (self.func)(ctx, args)
    }
}
