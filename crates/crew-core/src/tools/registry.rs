//! Tool registry for managing available tools
//!
//! Registration order is invocation order: an agent allowed several tools runs
//! them in the order they were registered here, whatever order its
//! configuration lists them in.

use std::sync::Arc;

use super::Tool;

/// Ordered registry of available tools
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool, appending it to the invocation order.
    ///
    /// Re-registering a name replaces the earlier tool in place.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register an already shared tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(idx) => self.tools[idx] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// List all registered tool names in invocation order
    pub fn list_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get all tools in invocation order
    pub fn all_tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Tools whose names appear in `allowed`, in registry order
    pub fn select<S: AsRef<str>>(&self, allowed: &[S]) -> Vec<Arc<dyn Tool>> {
        self.tools
            .iter()
            .filter(|t| allowed.iter().any(|a| AsRef::<str>::as_ref(a) == t.name()))
            .cloned()
            .collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    struct MockTool(&'static str);

    impl Tool for MockTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "A mock tool for testing"
        }

        fn run(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool("mock"));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("mock").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_registry_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool("c"));
        registry.register(MockTool("a"));
        registry.register(MockTool("b"));

        assert_eq!(registry.list_names(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_registry_replace_keeps_position() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool("a"));
        registry.register(MockTool("b"));
        registry.register(MockTool("a"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.list_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_select_uses_registry_order() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool("first"));
        registry.register(MockTool("second"));
        registry.register(MockTool("third"));

        let selected = registry.select(&["third", "unknown", "first"]);
        let names: Vec<&str> = selected.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["first", "third"]);
    }
}
