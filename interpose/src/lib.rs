//! # interpose - Method Interception Through Filter Chains
//!
//! `interpose` wraps a named callable (a "slot") in an ordered chain of
//! filters. Each filter sees the call before the ones attached earlier,
//! may rewrite the arguments, decorate the result, or stop the call, and
//! can be disabled, re-enabled or removed through the handle returned when
//! it was attached. Removing the last filter puts the original callable
//! back exactly as it was.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use interpose::prelude::*;
//!
//! let greet = Slot::new("greet", |_: &(), name: String| format!("Hi {name}"));
//!
//! let a = greet.attach_fn(|_, args, next| format!("A:{}", next.run(args)));
//! let b = greet.attach_fn(|_, args, next| format!("B:{}", next.run(args)));
//! assert_eq!(greet.call(&(), "Sam".into()), "B:A:Hi Sam");
//!
//! b.remove();
//! a.off();
//! assert_eq!(greet.call(&(), "Sam".into()), "Hi Sam");
//! ```
//!
//! ## Hosts and Registries
//!
//! When methods are addressed by owner and name rather than held directly,
//! declare them on an [`Interceptor`] and attach by `(host, name)`:
//!
//! ```rust,ignore
//! let interceptor = Interceptor::new();
//! let greeter = HostId::new();
//! interceptor.define(&greeter, "greet", |_: &(), name: String| format!("Hi {name}"))?;
//! let handle = interceptor.attach(&greeter, "greet", LoggingFilter::new("greet"))?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use interpose_core::{
    // Chain
    Chain,
    Dispatcher,
    // Filter
    Filter,
    FilterEntry,
    FilterFn,
    FilterId,
    // Host
    Host,
    HostId,
    // Error types
    InterceptError,
    Next,
    // Target
    Target,
    TargetFn,
};

pub use interpose_std::{FilterHandle, Interceptor, Slot};

/// Standard filter implementations.
pub mod filters {
    #![allow(clippy::wildcard_imports)]
    pub use interpose_std::filters::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use interpose_std::testing::*;
}

/// Prelude module - common imports for Interpose.
///
/// # Usage
///
/// ```rust,ignore
/// use interpose::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Core traits
        Filter,
        FilterFn,
        FilterHandle,
        Host,
        HostId,
        // Errors
        InterceptError,
        Interceptor,
        Next,
        Slot,
        Target,
        TargetFn,
        // Standard filters
        filters::{Guard, LoggingFilter, MapArgs, MapResult},
    };
}
