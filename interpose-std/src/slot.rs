//! Interceptable slots and filter handles.
//!
//! A [`Slot`] is a named cell holding a callable. Until something is
//! attached it holds the original target and calls go straight to it. The
//! first [`Slot::attach`] installs a [`Dispatcher`] over a fresh [`Chain`];
//! later attaches extend that chain. Removing the last filter uninstalls the
//! dispatcher and the slot holds the original again, pointer-identical to
//! what it held before.
//!
//! Every attach returns a [`FilterHandle`] scoped to that one entry.

use interpose_core::{
    Chain, Dispatcher, Filter, FilterEntry, FilterFn, FilterId, Next, Target, TargetFn,
};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

enum Installed<C, A, R> {
    Original,
    Intercepted(Arc<Dispatcher<C, A, R>>),
}

struct SlotState<C, A, R> {
    original: Arc<dyn Target<C, A, R>>,
    installed: RwLock<Installed<C, A, R>>,
}

/// A named, interceptable callable.
///
/// Cloning a `Slot` is cheap and yields another view of the same cell.
///
/// # Example
///
/// ```rust,ignore
/// let greet = Slot::new("greet", |_: &(), name: String| format!("Hi {name}"));
/// let a = greet.attach_fn(|_, args, next| format!("A:{}", next.run(args)));
/// let b = greet.attach_fn(|_, args, next| format!("B:{}", next.run(args)));
///
/// assert_eq!(greet.call(&(), "Sam".into()), "B:A:Hi Sam");
/// ```
pub struct Slot<C, A, R> {
    name: Arc<str>,
    state: Arc<SlotState<C, A, R>>,
}

impl<C, A, R> Clone for Slot<C, A, R> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: 'static, A: 'static, R: 'static> Slot<C, A, R> {
    /// Create a slot holding a closure as its original target.
    pub fn new<F>(name: impl Into<Arc<str>>, target: F) -> Self
    where
        F: Fn(&C, A) -> R + Send + Sync + 'static,
    {
        Self::from_target(name, Arc::new(TargetFn::new(target)))
    }

    /// Create a slot around an existing target.
    pub fn from_target(name: impl Into<Arc<str>>, original: Arc<dyn Target<C, A, R>>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(SlotState {
                original,
                installed: RwLock::new(Installed::Original),
            }),
        }
    }

    /// The slot's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    /// The original target, whether or not it is currently intercepted.
    pub fn original(&self) -> Arc<dyn Target<C, A, R>> {
        Arc::clone(&self.state.original)
    }

    /// The callable currently installed: the original or a dispatcher.
    pub fn current(&self) -> Arc<dyn Target<C, A, R>> {
        match self.dispatcher() {
            Some(dispatcher) => dispatcher,
            None => self.original(),
        }
    }

    /// Whether a dispatcher is installed.
    pub fn is_intercepted(&self) -> bool {
        matches!(
            *self.state.installed.read().unwrap_or_else(PoisonError::into_inner),
            Installed::Intercepted(_)
        )
    }

    /// The live chain, if the slot is intercepted.
    pub fn chain(&self) -> Option<Arc<Chain<C, A, R>>> {
        match &*self.state.installed.read().unwrap_or_else(PoisonError::into_inner) {
            Installed::Intercepted(dispatcher) => Some(Arc::clone(dispatcher.chain())),
            Installed::Original => None,
        }
    }

    /// Number of attached filters, enabled or not.
    pub fn filter_count(&self) -> usize {
        self.chain().map_or(0, |chain| chain.len())
    }

    /// Invoke whatever the slot currently holds.
    pub fn call(&self, ctx: &C, args: A) -> R {
        // Resolve first so no lock is held while user code runs.
        self.current().invoke(ctx, args)
    }

    /// Attach a filter. It runs before every filter attached earlier.
    pub fn attach<F>(&self, filter: F) -> FilterHandle<C, A, R>
    where
        F: Filter<C, A, R> + 'static,
    {
        let mut installed = self
            .state
            .installed
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let chain = match &*installed {
            Installed::Intercepted(dispatcher) => Arc::clone(dispatcher.chain()),
            Installed::Original => {
                let chain = Arc::new(Chain::new(Arc::clone(&self.state.original)));
                *installed = Installed::Intercepted(Arc::new(Dispatcher::new(Arc::clone(&chain))));
                #[cfg(feature = "tracing")]
                tracing::debug!(slot = %self.name, "dispatcher installed");
                chain
            }
        };

        let entry = chain.push(Box::new(filter));
        drop(installed);

        #[cfg(feature = "tracing")]
        tracing::trace!(slot = %self.name, filter = %entry.id(), "filter attached");

        FilterHandle {
            slot: self.clone(),
            chain,
            entry,
        }
    }

    /// Attach a closure as a filter.
    pub fn attach_fn<F>(&self, filter: F) -> FilterHandle<C, A, R>
    where
        F: for<'a> Fn(&'a C, A, Next<'a, C, A, R>) -> R + Send + Sync + 'static,
    {
        self.attach(FilterFn::new(filter))
    }

    /// Drop every filter and put the original target back.
    ///
    /// Outstanding handles become inert. Returns how many filters were dropped.
    pub fn restore(&self) -> usize {
        let mut installed = self
            .state
            .installed
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match std::mem::replace(&mut *installed, Installed::Original) {
            Installed::Intercepted(dispatcher) => {
                let dropped = dispatcher.chain().clear();
                #[cfg(feature = "tracing")]
                tracing::debug!(slot = %self.name, dropped, "slot restored");
                dropped
            }
            Installed::Original => 0,
        }
    }

    fn dispatcher(&self) -> Option<Arc<dyn Target<C, A, R>>> {
        match &*self.state.installed.read().unwrap_or_else(PoisonError::into_inner) {
            Installed::Intercepted(dispatcher) => {
                Some(Arc::clone(dispatcher) as Arc<dyn Target<C, A, R>>)
            }
            Installed::Original => None,
        }
    }

    fn detach(&self, chain: &Arc<Chain<C, A, R>>, id: FilterId) -> bool {
        let mut installed = self
            .state
            .installed
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let Installed::Intercepted(dispatcher) = &*installed else {
            return false;
        };
        // A handle from a chain that was since restored must not touch the new one.
        if !Arc::ptr_eq(dispatcher.chain(), chain) || chain.remove(id).is_none() {
            return false;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(slot = %self.name, filter = %id, "filter removed");

        if chain.is_empty() {
            *installed = Installed::Original;
            #[cfg(feature = "tracing")]
            tracing::debug!(slot = %self.name, "dispatcher uninstalled");
        }
        true
    }
}

impl<C, A, R> fmt::Debug for Slot<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let installed = self
            .state
            .installed
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let filters = match &*installed {
            Installed::Intercepted(dispatcher) => dispatcher.chain().len(),
            Installed::Original => 0,
        };
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("filters", &filters)
            .finish()
    }
}

/// Caller-held handle to one attached filter.
///
/// Clones manage the same entry. Once removed, the handle is inert: toggling
/// it changes a flag nothing reads any more.
pub struct FilterHandle<C, A, R> {
    slot: Slot<C, A, R>,
    chain: Arc<Chain<C, A, R>>,
    entry: Arc<FilterEntry<C, A, R>>,
}

impl<C, A, R> Clone for FilterHandle<C, A, R> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            chain: Arc::clone(&self.chain),
            entry: Arc::clone(&self.entry),
        }
    }
}

impl<C: 'static, A: 'static, R: 'static> FilterHandle<C, A, R> {
    /// Identity of the managed entry.
    pub fn id(&self) -> FilterId {
        self.entry.id()
    }

    /// The slot this filter was attached to.
    pub fn slot(&self) -> &Slot<C, A, R> {
        &self.slot
    }

    /// Detach the filter.
    ///
    /// Uninstalls the dispatcher when this was the last filter. Returns
    /// `false` if the filter was already gone.
    pub fn remove(&self) -> bool {
        self.slot.detach(&self.chain, self.entry.id())
    }

    /// Re-enable the filter.
    pub fn on(&self) {
        self.set_enabled(true);
    }

    /// Disable the filter; dispatch skips it until [`on`](Self::on).
    pub fn off(&self) {
        self.set_enabled(false);
    }

    /// Alias for [`on`](Self::on).
    pub fn enable(&self) {
        self.on();
    }

    /// Alias for [`off`](Self::off).
    pub fn disable(&self) {
        self.off();
    }

    /// Set the enabled flag.
    pub fn set_enabled(&self, enabled: bool) {
        self.entry.set_enabled(enabled);
        #[cfg(feature = "tracing")]
        tracing::trace!(slot = %self.slot.name, filter = %self.entry.id(), enabled, "filter toggled");
    }

    /// Flip the enabled flag, returning the new state.
    pub fn toggle(&self) -> bool {
        let enabled = self.entry.toggle();
        #[cfg(feature = "tracing")]
        tracing::trace!(slot = %self.slot.name, filter = %self.entry.id(), enabled, "filter toggled");
        enabled
    }

    /// Whether the filter is enabled.
    pub fn is_enabled(&self) -> bool {
        self.entry.is_enabled()
    }

    /// Whether the filter is still part of the slot's chain.
    pub fn is_attached(&self) -> bool {
        self.chain.contains(self.entry.id())
    }
}

impl<C, A, R> fmt::Debug for FilterHandle<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterHandle")
            .field("slot", &self.slot.name)
            .field("entry", &self.entry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greet() -> Slot<(), String, String> {
        Slot::new("greet", |_: &(), name: String| format!("Hi {name}"))
    }

    fn tag(slot: &Slot<(), String, String>, tag: &'static str) -> FilterHandle<(), String, String> {
        slot.attach_fn(move |_, args, next| format!("{tag}:{}", next.run(args)))
    }

    #[test]
    fn test_unintercepted_slot_calls_original() {
        let slot = greet();
        assert!(!slot.is_intercepted());
        assert_eq!(slot.filter_count(), 0);
        assert!(Arc::ptr_eq(&slot.current(), &slot.original()));
        assert_eq!(slot.call(&(), "Sam".into()), "Hi Sam");
    }

    #[test]
    fn test_first_attach_installs_dispatcher() {
        let slot = greet();
        let original = slot.current();
        let _a = tag(&slot, "A");

        assert!(slot.is_intercepted());
        assert!(!Arc::ptr_eq(&slot.current(), &original));
        assert_eq!(slot.call(&(), "Sam".into()), "A:Hi Sam");
    }

    #[test]
    fn test_second_attach_extends_same_chain() {
        let slot = greet();
        let _a = tag(&slot, "A");
        let chain = slot.chain().expect("intercepted");
        let _b = tag(&slot, "B");

        assert!(Arc::ptr_eq(&chain, &slot.chain().expect("intercepted")));
        assert_eq!(slot.filter_count(), 2);
    }

    #[test]
    fn test_removing_last_filter_restores_original() {
        let slot = greet();
        let original = slot.current();
        let a = tag(&slot, "A");

        assert!(a.remove());
        assert!(!slot.is_intercepted());
        assert!(Arc::ptr_eq(&slot.current(), &original));
        assert!(!a.is_attached());
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let slot = greet();
        let a = tag(&slot, "A");
        let _b = tag(&slot, "B");

        assert!(a.remove());
        assert!(!a.remove());
        assert_eq!(slot.filter_count(), 1);
        assert_eq!(slot.call(&(), "Sam".into()), "B:Hi Sam");
    }

    #[test]
    fn test_stale_handle_does_not_touch_new_chain() {
        let slot = greet();
        let a = tag(&slot, "A");
        assert_eq!(slot.restore(), 1);

        let b = tag(&slot, "B");
        assert!(!a.remove());
        assert!(b.is_attached());
        assert_eq!(slot.call(&(), "Sam".into()), "B:Hi Sam");
    }

    #[test]
    fn test_toggle_after_remove_is_inert() {
        let slot = greet();
        let a = tag(&slot, "A");
        let _b = tag(&slot, "B");
        a.remove();

        a.off();
        a.on();
        assert_eq!(slot.call(&(), "Sam".into()), "B:Hi Sam");
    }

    #[test]
    fn test_handle_clones_share_entry() {
        let slot = greet();
        let a = tag(&slot, "A");
        let a2 = a.clone();

        a2.off();
        assert!(!a.is_enabled());
        assert_eq!(a.id(), a2.id());
        assert!(a.toggle());
        assert!(a2.is_enabled());
    }

    #[test]
    fn test_restore_without_filters() {
        let slot = greet();
        assert_eq!(slot.restore(), 0);
        assert!(!slot.is_intercepted());
    }

    #[test]
    fn test_debug_output() {
        let slot = greet();
        let _a = tag(&slot, "A");
        let rendered = format!("{slot:?}");
        assert!(rendered.contains("greet"));
        assert!(rendered.contains("filters: 1"));
    }
}
