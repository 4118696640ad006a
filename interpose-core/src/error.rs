//! Error types for Interpose.
//!
//! Interception itself never fails: filters and targets return whatever they
//! return, and panics propagate untouched. The only failures are violated
//! preconditions when addressing a slot through a registry:
//!
//! - [`InterceptError::SlotNotFound`] - nothing is defined at `(host, name)`
//! - [`InterceptError::SlotAlreadyDefined`] - `(host, name)` is already taken

use crate::host::HostId;
use thiserror::Error;

/// Error returned when a slot cannot be addressed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterceptError {
    /// No original callable was defined for this host and slot name.
    #[error("no slot named `{name}` on {host}")]
    SlotNotFound {
        /// Host that was addressed.
        host: HostId,
        /// Requested slot name.
        name: String,
    },

    /// A slot with this name already exists on the host.
    #[error("slot `{name}` is already defined on {host}")]
    SlotAlreadyDefined {
        /// Host that was addressed.
        host: HostId,
        /// Conflicting slot name.
        name: String,
    },
}

impl InterceptError {
    /// Create a [`InterceptError::SlotNotFound`] error.
    pub fn not_found(host: HostId, name: impl Into<String>) -> Self {
        Self::SlotNotFound {
            host,
            name: name.into(),
        }
    }

    /// Create a [`InterceptError::SlotAlreadyDefined`] error.
    pub fn already_defined(host: HostId, name: impl Into<String>) -> Self {
        Self::SlotAlreadyDefined {
            host,
            name: name.into(),
        }
    }

    /// The slot name this error refers to.
    pub fn slot_name(&self) -> &str {
        match self {
            Self::SlotNotFound { name, .. } | Self::SlotAlreadyDefined { name, .. } => name,
        }
    }
}
