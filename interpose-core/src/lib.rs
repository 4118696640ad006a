//! # interpose-core
//!
//! Core traits for the Interpose method interception toolkit.
//!
//! This crate has minimal dependencies and is meant to be imported by code
//! that only writes filters or targets and doesn't need the slot registry
//! from `interpose-std`.
//!
//! # Building Blocks
//!
//! ## Target ([`Target`])
//!
//! The callable that occupies a slot: the original method, or the
//! [`Dispatcher`] installed over it. Every call carries an explicit context
//! `C`, arguments `A` and produces `R`.
//!
//! ## Filter ([`Filter`])
//!
//! An interceptor. Receives the context, the arguments and a [`Next`]
//! continuation, and decides whether to continue the chain, rewrite the
//! arguments, decorate the result, or stop.
//!
//! ## Chain ([`Chain`])
//!
//! The original target plus attached filters in attachment order. Dispatch
//! walks it backwards, newest filter first, skipping disabled entries,
//! ending at the original.
//!
//! ## Hosts ([`Host`], [`HostId`])
//!
//! Identity tokens used by registries to key slots by `(host, name)`.
//!
//! # Error Types
//!
//! - [`InterceptError`] - Slot addressing failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod chain;
mod error;
mod filter;
mod host;
mod target;

// Re-exports
pub use chain::{Chain, Dispatcher, FilterEntry, FilterId};
pub use error::InterceptError;
pub use filter::{Filter, FilterFn, Next};
pub use host::{Host, HostId};
pub use target::{Target, TargetFn};
