//! # interpose-std
//!
//! Standard implementations for the Interpose method interception toolkit.
//!
//! This crate provides:
//! - **Slots**: [`Slot`], an interceptable named callable, and [`FilterHandle`]
//! - **Registry**: [`Interceptor`], slots keyed by host and name
//! - **Standard filters**: Logging, Conditional, Map, Guard
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use interpose_core;

// Modules
pub mod filters;
pub mod registry;
pub mod slot;
pub mod testing;

pub use registry::Interceptor;
pub use slot::{FilterHandle, Slot};
