//! Conditional filters - run filters based on the call.

use interpose_core::{Filter, Next};

/// A filter that only runs an inner filter when a predicate holds.
///
/// When the predicate returns `false`, the call is forwarded unchanged as if
/// the inner filter were disabled.
///
/// # Example
///
/// ```rust,ignore
/// // Only audit writes above a threshold
/// let audit_large = ConditionalFilter::new(
///     |_: &Session, amount: &u64| *amount > 10_000,
///     AuditFilter::new(),
/// );
/// transfer.attach(audit_large);
/// ```
#[derive(Debug, Clone)]
pub struct ConditionalFilter<P, F> {
    predicate: P,
    inner: F,
}

impl<P, F> ConditionalFilter<P, F> {
    /// Create a new `ConditionalFilter`.
    pub fn new(predicate: P, inner: F) -> Self {
        Self { predicate, inner }
    }
}

impl<C, A, R, P, F> Filter<C, A, R> for ConditionalFilter<P, F>
where
    P: Fn(&C, &A) -> bool + Send + Sync,
    F: Filter<C, A, R>,
{
    fn apply(&self, ctx: &C, args: A, next: Next<'_, C, A, R>) -> R {
        if (self.predicate)(ctx, &args) {
            self.inner.apply(ctx, args, next)
        } else {
            next.run(args)
        }
    }
}

/// A filter that runs one of two inner filters based on a predicate.
#[derive(Debug, Clone)]
pub struct BranchFilter<P, T, E> {
    predicate: P,
    then_filter: T,
    else_filter: E,
}

impl<P, T, E> BranchFilter<P, T, E> {
    /// Create a new `BranchFilter`.
    pub fn new(predicate: P, then_filter: T, else_filter: E) -> Self {
        Self {
            predicate,
            then_filter,
            else_filter,
        }
    }
}

impl<C, A, R, P, T, E> Filter<C, A, R> for BranchFilter<P, T, E>
where
    P: Fn(&C, &A) -> bool + Send + Sync,
    T: Filter<C, A, R>,
    E: Filter<C, A, R>,
{
    fn apply(&self, ctx: &C, args: A, next: Next<'_, C, A, R>) -> R {
        if (self.predicate)(ctx, &args) {
            self.then_filter.apply(ctx, args, next)
        } else {
            self.else_filter.apply(ctx, args, next)
        }
    }
}
