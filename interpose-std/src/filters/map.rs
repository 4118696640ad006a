//! Filters that rewrite arguments or results.

use interpose_core::{Filter, Next};

/// A filter that transforms the arguments before forwarding them.
///
/// Everything further down the chain, the original target included, sees
/// the transformed value.
#[derive(Debug, Clone)]
pub struct MapArgs<M> {
    mapper: M,
}

impl<M> MapArgs<M> {
    /// Create a new argument mapper.
    pub fn new(mapper: M) -> Self {
        Self { mapper }
    }
}

impl<C, A, R, M> Filter<C, A, R> for MapArgs<M>
where
    M: Fn(&C, A) -> A + Send + Sync,
{
    fn apply(&self, ctx: &C, args: A, next: Next<'_, C, A, R>) -> R {
        next.run((self.mapper)(ctx, args))
    }
}

/// A filter that transforms the value returned by the rest of the chain.
#[derive(Debug, Clone)]
pub struct MapResult<M> {
    mapper: M,
}

impl<M> MapResult<M> {
    /// Create a new result mapper.
    pub fn new(mapper: M) -> Self {
        Self { mapper }
    }
}

impl<C, A, R, M> Filter<C, A, R> for MapResult<M>
where
    M: Fn(&C, R) -> R + Send + Sync,
{
    fn apply(&self, ctx: &C, args: A, next: Next<'_, C, A, R>) -> R {
        (self.mapper)(ctx, next.run(args))
    }
}
