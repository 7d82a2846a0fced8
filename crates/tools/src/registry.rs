//! Tool registry for managing available tools.

use crate::types::{Tool, ToolDefinition};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Registry of available tools.
///
/// Registration order is preserved; the router enumerates tools to the
/// model in that order.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
    enabled: HashSet<String>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            enabled: HashSet::new(),
        }
    }

    /// Register a tool (enabled by default). Re-registering a name replaces it.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name.clone(), tool);
        self.enabled.insert(name);
    }

    /// Enable a tool by name.
    pub fn enable(&mut self, name: &str) {
        if self.tools.contains_key(name) {
            self.enabled.insert(name.to_string());
        }
    }

    /// Disable a tool by name.
    pub fn disable(&mut self, name: &str) {
        self.enabled.remove(name);
    }

    /// Check if a tool is enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    /// Enabled tools in registration order.
    pub fn enabled_tools(&self) -> impl Iterator<Item = &Arc<dyn Tool>> + '_ {
        self.order
            .iter()
            .filter(|name| self.enabled.contains(*name))
            .filter_map(|name| self.tools.get(name))
    }

    /// Get definitions for all enabled tools.
    pub fn get_definitions(&self) -> Vec<ToolDefinition> {
        self.enabled_tools().map(|tool| tool.definition()).collect()
    }

    /// Get a tool by function name (only if enabled).
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        if self.enabled.contains(name) {
            self.tools.get(name).cloned()
        } else {
            None
        }
    }

    /// Look up an enabled tool by its route key, ignoring case.
    pub fn get_by_route(&self, route: &str) -> Option<Arc<dyn Tool>> {
        self.enabled_tools()
            .find(|tool| tool.route().eq_ignore_ascii_case(route))
            .cloned()
    }

    /// Route keys of enabled tools, in registration order.
    pub fn routes(&self) -> Vec<&str> {
        self.enabled_tools().map(|tool| tool.route()).collect()
    }

    /// List all registered tool names in registration order.
    pub fn list_tools(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
