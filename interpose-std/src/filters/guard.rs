//! Guard filter for short-circuiting calls.

use interpose_core::{Filter, Next};

/// A filter that lets a call through only when a predicate holds.
///
/// Otherwise the chain stops here and the fallback produces the result;
/// filters attached earlier and the original target never run.
///
/// # Example
///
/// ```rust,ignore
/// let read_only = Guard::new(
///     |session: &Session, _: &Write| session.can_write(),
///     |_: &Session, _: Write| Err(StoreError::ReadOnly),
/// );
/// store.attach(read_only);
/// ```
#[derive(Debug, Clone)]
pub struct Guard<P, D> {
    predicate: P,
    fallback: D,
}

impl<P, D> Guard<P, D> {
    /// Create a new `Guard`.
    pub fn new(predicate: P, fallback: D) -> Self {
        Self {
            predicate,
            fallback,
        }
    }
}

impl<C, A, R, P, D> Filter<C, A, R> for Guard<P, D>
where
    P: Fn(&C, &A) -> bool + Send + Sync,
    D: Fn(&C, A) -> R + Send + Sync,
{
    fn apply(&self, ctx: &C, args: A, next: Next<'_, C, A, R>) -> R {
        if (self.predicate)(ctx, &args) {
            next.run(args)
        } else {
            (self.fallback)(ctx, args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use crate::slot::Slot;

    #[test]
    fn test_guard_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let slot = Slot::new("divide", move |_: &(), (a, b): (i32, i32)| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(a / b)
        });
        slot.attach(Guard::new(
            |_: &(), args: &(i32, i32)| args.1 != 0,
            |_: &(), _: (i32, i32)| -> Option<i32> { None },
        ));

        assert_eq!(slot.call(&(), (10, 2)), Some(5));
        assert_eq!(slot.call(&(), (10, 0)), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
