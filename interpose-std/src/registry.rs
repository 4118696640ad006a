//! Slot registry keyed by host and slot name.
//!
//! [`Interceptor`] is the place where hosts declare their interceptable
//! methods and where callers attach filters by `(host, name)` instead of
//! holding on to [`Slot`] values themselves.

use crate::slot::{FilterHandle, Slot};
use interpose_core::{Filter, Host, HostId, InterceptError, Next, Target};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

type HostSlots<C, A, R> = HashMap<Arc<str>, Slot<C, A, R>>;

/// Registry of interceptable slots.
///
/// # Example
/// ```ignore
/// let interceptor = Interceptor::new();
/// let greeter = HostId::new();
///
/// interceptor.define(&greeter, "greet", |_: &(), name: String| format!("Hi {name}"))?;
/// let handle = interceptor.attach_fn(&greeter, "greet", |_, args, next| {
///     format!("A:{}", next.run(args))
/// })?;
///
/// assert_eq!(interceptor.invoke(&greeter, "greet", &(), "Sam".into())?, "A:Hi Sam");
/// handle.remove();
/// ```
pub struct Interceptor<C, A, R> {
    hosts: RwLock<HashMap<HostId, HostSlots<C, A, R>>>,
}

impl<C, A, R> Default for Interceptor<C, A, R> {
    fn default() -> Self {
        Self {
            hosts: RwLock::new(HashMap::new()),
        }
    }
}

impl<C: 'static, A: 'static, R: 'static> Interceptor<C, A, R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an interceptable slot backed by a closure.
    pub fn define<H, F>(
        &self,
        host: &H,
        name: impl Into<Arc<str>>,
        target: F,
    ) -> Result<Slot<C, A, R>, InterceptError>
    where
        H: Host + ?Sized,
        F: Fn(&C, A) -> R + Send + Sync + 'static,
    {
        self.insert(host.host_id(), Slot::new(name, target))
    }

    /// Declare an interceptable slot backed by an existing target.
    pub fn define_target<H>(
        &self,
        host: &H,
        name: impl Into<Arc<str>>,
        target: Arc<dyn Target<C, A, R>>,
    ) -> Result<Slot<C, A, R>, InterceptError>
    where
        H: Host + ?Sized,
    {
        self.insert(host.host_id(), Slot::from_target(name, target))
    }

    /// Remove a slot from the registry.
    ///
    /// Handles already issued for it keep working against the returned slot.
    pub fn undefine<H: Host + ?Sized>(&self, host: &H, name: &str) -> Option<Slot<C, A, R>> {
        let host = host.host_id();
        let mut hosts = self.hosts.write().unwrap_or_else(PoisonError::into_inner);
        let slots = hosts.get_mut(&host)?;
        let slot = slots.remove(name);
        if slots.is_empty() {
            hosts.remove(&host);
        }
        slot
    }

    /// Drop every slot belonging to `host`, returning how many there were.
    pub fn forget_host<H: Host + ?Sized>(&self, host: &H) -> usize {
        let host = host.host_id();
        let removed = self
            .hosts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&host)
            .map_or(0, |slots| slots.len());

        #[cfg(feature = "tracing")]
        tracing::debug!(%host, removed, "host forgotten");

        removed
    }

    /// Look up a slot.
    pub fn slot<H: Host + ?Sized>(
        &self,
        host: &H,
        name: &str,
    ) -> Result<Slot<C, A, R>, InterceptError> {
        let host = host.host_id();
        self.hosts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&host)
            .and_then(|slots| slots.get(name))
            .cloned()
            .ok_or_else(|| InterceptError::not_found(host, name))
    }

    /// Attach a filter to `(host, name)`.
    pub fn attach<H, F>(
        &self,
        host: &H,
        name: &str,
        filter: F,
    ) -> Result<FilterHandle<C, A, R>, InterceptError>
    where
        H: Host + ?Sized,
        F: Filter<C, A, R> + 'static,
    {
        Ok(self.slot(host, name)?.attach(filter))
    }

    /// Attach a closure as a filter to `(host, name)`.
    pub fn attach_fn<H, F>(
        &self,
        host: &H,
        name: &str,
        filter: F,
    ) -> Result<FilterHandle<C, A, R>, InterceptError>
    where
        H: Host + ?Sized,
        F: for<'a> Fn(&'a C, A, Next<'a, C, A, R>) -> R + Send + Sync + 'static,
    {
        Ok(self.slot(host, name)?.attach_fn(filter))
    }

    /// Call whatever `(host, name)` currently holds.
    ///
    /// The registry lock is released before the call, so filters may use the
    /// registry themselves.
    pub fn invoke<H: Host + ?Sized>(
        &self,
        host: &H,
        name: &str,
        ctx: &C,
        args: A,
    ) -> Result<R, InterceptError> {
        let slot = self.slot(host, name)?;
        Ok(slot.call(ctx, args))
    }

    /// The callable currently installed at `(host, name)`.
    pub fn current<H: Host + ?Sized>(
        &self,
        host: &H,
        name: &str,
    ) -> Result<Arc<dyn Target<C, A, R>>, InterceptError> {
        Ok(self.slot(host, name)?.current())
    }

    /// Whether `(host, name)` exists and has a dispatcher installed.
    pub fn is_intercepted<H: Host + ?Sized>(&self, host: &H, name: &str) -> bool {
        self.slot(host, name).is_ok_and(|slot| slot.is_intercepted())
    }

    /// Slot names defined for `host`, sorted.
    pub fn slot_names<H: Host + ?Sized>(&self, host: &H) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self
            .hosts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&host.host_id())
            .map(|slots| slots.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Hosts with at least one slot.
    pub fn hosts(&self) -> Vec<HostId> {
        self.hosts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    /// Total number of slots across all hosts.
    pub fn len(&self) -> usize {
        self.hosts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(HashMap::len)
            .sum()
    }

    /// Whether no slot is defined.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, host: HostId, slot: Slot<C, A, R>) -> Result<Slot<C, A, R>, InterceptError> {
        let mut hosts = self.hosts.write().unwrap_or_else(PoisonError::into_inner);
        let slots = hosts.entry(host).or_default();
        if slots.contains_key(slot.name()) {
            return Err(InterceptError::already_defined(host, slot.name()));
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(%host, slot = slot.name(), "slot defined");

        slots.insert(Arc::clone(slot.shared_name()), slot.clone());
        Ok(slot)
    }
}

impl<C, A, R> fmt::Debug for Interceptor<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hosts = self.hosts.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_map()
            .entries(hosts.iter().map(|(host, slots)| (host, slots.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Registry = Interceptor<(), String, String>;

    fn registry_with_greet(host: HostId) -> Registry {
        let registry = Registry::new();
        registry
            .define(&host, "greet", |_: &(), name: String| format!("Hi {name}"))
            .unwrap();
        registry
    }

    #[test]
    fn test_define_and_invoke() {
        let host = HostId::new();
        let registry = registry_with_greet(host);
        assert_eq!(registry.invoke(&host, "greet", &(), "Sam".into()).unwrap(), "Hi Sam");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_define_twice_fails() {
        let host = HostId::new();
        let registry = registry_with_greet(host);
        let err = registry
            .define(&host, "greet", |_: &(), _: String| String::new())
            .unwrap_err();
        assert_eq!(err, InterceptError::already_defined(host, "greet"));
    }

    #[test]
    fn test_attach_to_missing_slot_fails() {
        let host = HostId::new();
        let registry = registry_with_greet(host);
        let err = registry
            .attach_fn(&host, "farewell", |_, args, next| next.run(args))
            .unwrap_err();
        assert_eq!(err, InterceptError::not_found(host, "farewell"));

        let other = HostId::new();
        assert!(registry.invoke(&other, "greet", &(), "Sam".into()).is_err());
    }

    #[test]
    fn test_same_name_on_different_hosts_is_independent() {
        let first = HostId::new();
        let second = HostId::new();
        let registry = registry_with_greet(first);
        registry
            .define(&second, "greet", |_: &(), name: String| format!("Yo {name}"))
            .unwrap();

        registry
            .attach_fn(&first, "greet", |_, args, next| format!("A:{}", next.run(args)))
            .unwrap();

        assert!(registry.is_intercepted(&first, "greet"));
        assert!(!registry.is_intercepted(&second, "greet"));
        assert_eq!(registry.invoke(&second, "greet", &(), "Sam".into()).unwrap(), "Yo Sam");
    }

    #[test]
    fn test_remove_restores_current() {
        let host = HostId::new();
        let registry = registry_with_greet(host);
        let original = registry.current(&host, "greet").unwrap();

        let handle = registry
            .attach_fn(&host, "greet", |_, args, next| next.run(args))
            .unwrap();
        assert!(!Arc::ptr_eq(&registry.current(&host, "greet").unwrap(), &original));

        handle.remove();
        assert!(Arc::ptr_eq(&registry.current(&host, "greet").unwrap(), &original));
    }

    #[test]
    fn test_undefine_and_forget_host() {
        let host = HostId::new();
        let registry = registry_with_greet(host);
        registry
            .define(&host, "farewell", |_: &(), name: String| format!("Bye {name}"))
            .unwrap();

        assert_eq!(
            registry.slot_names(&host),
            vec![Arc::<str>::from("farewell"), Arc::<str>::from("greet")]
        );
        assert!(registry.undefine(&host, "farewell").is_some());
        assert!(registry.undefine(&host, "farewell").is_none());
        assert_eq!(registry.forget_host(&host), 1);
        assert!(registry.is_empty());
        assert!(registry.hosts().is_empty());
    }

    #[test]
    fn test_registry_key_shares_slot_name() {
        let host = HostId::new();
        let registry = Registry::new();
        let slot = registry
            .define(&host, "greet", |_: &(), name: String| format!("Hi {name}"))
            .unwrap();

        let names = registry.slot_names(&host);
        assert!(Arc::ptr_eq(&names[0], slot.shared_name()));
    }

    #[test]
    fn test_define_target_shares_existing_target() {
        use crate::testing::CountingTarget;

        let host = HostId::new();
        let target = CountingTarget::new(String::from("ok"));
        let registry = Registry::new();
        registry
            .define_target(&host, "ping", Arc::new(target.clone()))
            .unwrap();

        registry.invoke(&host, "ping", &(), String::new()).unwrap();
        registry.invoke(&host, "ping", &(), String::new()).unwrap();
        assert_eq!(target.count(), 2);
    }

    #[test]
    fn test_filter_can_reenter_registry() {
        let host = HostId::new();
        let registry = Arc::new(registry_with_greet(host));
        registry
            .define(&host, "name", |_: &(), raw: String| raw.trim().to_string())
            .unwrap();

        let inner = Arc::clone(&registry);
        registry
            .attach_fn(&host, "greet", move |ctx, args, next| {
                let cleaned = inner.invoke(&host, "name", ctx, args).unwrap();
                next.run(cleaned)
            })
            .unwrap();

        assert_eq!(registry.invoke(&host, "greet", &(), "  Sam ".into()).unwrap(), "Hi Sam");
    }
}
