//! Host identity.
//!
//! A host is whatever owns the intercepted methods: a service struct, a
//! plugin, a mock object. Interpose never owns hosts; it only needs a stable
//! token to key their slots by, which is what [`HostId`] is.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HOST_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a host.
///
/// Fresh ids from [`HostId::new`] are unique for the lifetime of the process.
/// [`HostId::from_raw`] lets callers map their own identifiers (database keys,
/// plugin indices) onto hosts instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostId(u64);

impl HostId {
    /// Allocate a new, process-unique host id.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(NEXT_HOST_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a caller-chosen raw id.
    ///
    /// Raw ids share a namespace with ids from [`HostId::new`]; mixing the two
    /// on one registry is the caller's responsibility.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value.
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host#{}", self.0)
    }
}

/// Anything that can be addressed as a host.
///
/// Implement this on your own types to pass them straight to a registry:
///
/// ```rust,ignore
/// struct Greeter { id: HostId }
///
/// impl Host for Greeter {
///     fn host_id(&self) -> HostId { self.id }
/// }
///
/// interceptor.attach(&greeter, "greet", my_filter)?;
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as an interception host",
    label = "missing `Host` implementation",
    note = "Implement `Host::host_id` or pass a `HostId` directly."
)]
pub trait Host {
    /// Stable identity of this host.
    fn host_id(&self) -> HostId;
}

impl Host for HostId {
    fn host_id(&self) -> HostId {
        *self
    }
}

impl<H: Host + ?Sized> Host for &H {
    fn host_id(&self) -> HostId {
        (**self).host_id()
    }
}

impl<H: Host + ?Sized> Host for std::sync::Arc<H> {
    fn host_id(&self) -> HostId {
        (**self).host_id()
    }
}
