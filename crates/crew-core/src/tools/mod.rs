//! Tool framework for crew agents
//!
//! A tool is an opaque capability with a single no-argument `run()`. Agents
//! receive their tools from a [`ToolRegistry`] when they are built.

pub mod builtin;
pub mod registry;

#[cfg(test)]
pub(crate) mod mock;

use anyhow::Result;

pub use registry::ToolRegistry;

/// The Tool trait that all tools must implement
pub trait Tool: Send + Sync {
    /// Identifier used in agent configuration
    fn name(&self) -> &str;

    /// Get a description of what the tool does
    fn description(&self) -> &str;

    /// Perform the tool's side effect
    fn run(&self) -> Result<()>;
}

impl std::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name()).finish()
    }
}
