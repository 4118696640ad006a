//! # Chain and Dispatcher
//!
//! A [`Chain`] is the state behind one intercepted slot: the original target
//! plus the attached filters in attachment order. A [`Dispatcher`] is the
//! callable installed in the slot while the chain is live; invoking it walks
//! the chain from the newest enabled filter down to the original.
//!
//! Entries are addressed by [`FilterId`], never by position, so removing one
//! filter leaves every other handle valid.

use crate::filter::{Filter, Next};
use crate::target::Target;
use std::fmt;
use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

static NEXT_FILTER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity token of one attached filter.
///
/// Every attach call gets a fresh id, even when the same filter value is
/// attached twice. Ids are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterId(u64);

impl FilterId {
    fn next() -> Self {
        Self(NEXT_FILTER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "filter#{}", self.0)
    }
}

/// One filter in a chain, with its own enabled flag.
pub struct FilterEntry<C, A, R> {
    id: FilterId,
    filter: Box<dyn Filter<C, A, R>>,
    enabled: AtomicBool,
}

impl<C, A, R> FilterEntry<C, A, R> {
    fn new(filter: Box<dyn Filter<C, A, R>>) -> Self {
        Self {
            id: FilterId::next(),
            filter,
            enabled: AtomicBool::new(true),
        }
    }

    /// The entry's identity.
    pub fn id(&self) -> FilterId {
        self.id
    }

    /// The wrapped filter.
    pub fn filter(&self) -> &dyn Filter<C, A, R> {
        &*self.filter
    }

    /// Whether dispatch currently runs this entry.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Set the enabled flag.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Flip the enabled flag, returning the new state.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::AcqRel)
    }
}

impl<C, A, R> fmt::Debug for FilterEntry<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEntry")
            .field("id", &self.id)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

/// The original target of a slot plus its attached filters.
pub struct Chain<C, A, R> {
    original: Arc<dyn Target<C, A, R>>,
    entries: RwLock<Vec<Arc<FilterEntry<C, A, R>>>>,
}

impl<C, A, R> Chain<C, A, R> {
    /// Create an empty chain around `original`.
    pub fn new(original: Arc<dyn Target<C, A, R>>) -> Self {
        Self {
            original,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// The callable this chain wraps.
    pub fn original(&self) -> &Arc<dyn Target<C, A, R>> {
        &self.original
    }

    /// Append a filter; it becomes the first to run.
    pub fn push(&self, filter: Box<dyn Filter<C, A, R>>) -> Arc<FilterEntry<C, A, R>> {
        let entry = Arc::new(FilterEntry::new(filter));
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&entry));
        entry
    }

    /// Remove the entry with `id`, returning it if it was present.
    pub fn remove(&self, id: FilterId) -> Option<Arc<FilterEntry<C, A, R>>> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let index = entries.iter().position(|e| e.id == id)?;
        Some(entries.remove(index))
    }

    /// Drop every entry, returning how many there were.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let count = entries.len();
        entries.clear();
        count
    }

    /// Whether an entry with `id` is still attached.
    pub fn contains(&self, id: FilterId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|e| e.id == id)
    }

    /// Number of attached filters, enabled or not.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no filter is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in attachment order (oldest first).
    pub fn ids(&self) -> Vec<FilterId> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.id)
            .collect()
    }

    /// Copy of the current entries, taken without holding the lock afterwards.
    pub fn snapshot(&self) -> Vec<Arc<FilterEntry<C, A, R>>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run one invocation through the chain.
    pub fn dispatch(&self, ctx: &C, args: A) -> R {
        // No lock is held while filters run, so they may attach or remove.
        let entries = self.snapshot();
        Next::new(ctx, &entries, &*self.original).run(args)
    }
}

impl<C, A, R> fmt::Debug for Chain<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("entries", &self.snapshot())
            .finish_non_exhaustive()
    }
}

/// The callable installed in a slot while it is intercepted.
pub struct Dispatcher<C, A, R> {
    chain: Arc<Chain<C, A, R>>,
}

impl<C, A, R> Dispatcher<C, A, R> {
    /// Create a dispatcher over `chain`.
    pub fn new(chain: Arc<Chain<C, A, R>>) -> Self {
        Self { chain }
    }

    /// The chain this dispatcher walks.
    pub fn chain(&self) -> &Arc<Chain<C, A, R>> {
        &self.chain
    }
}

impl<C, A, R> Clone for Dispatcher<C, A, R> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
        }
    }
}

impl<C, A, R> Target<C, A, R> for Dispatcher<C, A, R> {
    fn invoke(&self, ctx: &C, args: A) -> R {
        self.chain.dispatch(ctx, args)
    }
}

impl<C, A, R> fmt::Debug for Dispatcher<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("chain", &self.chain)
            .finish()
    }
}
