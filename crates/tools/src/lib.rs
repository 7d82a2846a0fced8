//! Tool descriptors, registry and local executors for the routing assistant.

mod error;
mod executor;
pub mod expr;
mod registry;
mod types;
pub mod builtin;

pub use builtin::Toolset;
pub use error::ToolError;
pub use executor::ToolExecutor;
pub use registry::ToolRegistry;
pub use types::*;
