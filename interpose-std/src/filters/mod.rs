//! Standard filter implementations.

pub mod conditional;
pub mod guard;
pub mod logging;
pub mod map;

pub use conditional::{BranchFilter, ConditionalFilter};
pub use guard::Guard;
pub use logging::LoggingFilter;
pub use map::{MapArgs, MapResult};
