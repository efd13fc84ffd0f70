//! Crew agents and their task history

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::error::{CrewError, Result};
use crate::tools::{Tool, ToolRegistry};

/// Ordered, append-only record of completed task ids.
///
/// Duplicates are kept: executing the same task twice records it twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskHistory {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl TaskHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, task_id: &str) {
        self.order.push(task_id.to_string());
        self.seen.insert(task_id.to_string());
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.seen.contains(task_id)
    }

    /// True when every id in `deps` has been completed
    pub fn satisfies<S: AsRef<str>>(&self, deps: &[S]) -> bool {
        deps.iter().all(|d| self.contains(AsRef::<str>::as_ref(d)))
    }

    /// Ids from `deps` that have not been completed yet
    pub fn missing<S: AsRef<str>>(&self, deps: &[S]) -> Vec<String> {
        deps.iter()
            .map(|d| AsRef::<str>::as_ref(d))
            .filter(|d| !self.contains(d))
            .map(str::to_string)
            .collect()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A crew member that executes tasks with its allowed tools
#[derive(Debug)]
pub struct Agent {
    id: String,
    role: String,
    goal: String,
    backstory: Option<String>,
    /// Tool ids exactly as configured
    tool_ids: Vec<String>,
    /// Resolved tools, in registry order
    tools: Vec<Arc<dyn Tool>>,
    history: TaskHistory,
}

impl Agent {
    /// Build an agent, resolving its allowed tools against `registry`.
    ///
    /// Tool ids the registry does not know are ignored with a warning.
    pub fn new(config: &AgentConfig, registry: &ToolRegistry) -> Self {
        for unknown in config.tools.iter().filter(|t| registry.get(t).is_none()) {
            warn!(agent = %config.id, tool = %unknown, "Ignoring unknown tool");
        }

        let tools = registry.select(&config.tools);
        debug!(
            agent = %config.id,
            tools = ?tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            "Built agent"
        );

        Self {
            id: config.id.clone(),
            role: config.role.clone(),
            goal: config.goal.clone(),
            backstory: config.backstory.clone(),
            tool_ids: config.tools.clone(),
            tools,
            history: TaskHistory::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backstory(&self) -> Option<&str> {
        self.backstory.as_deref()
    }

    pub fn tool_ids(&self) -> &[String] {
        &self.tool_ids
    }

    /// Names of the tools this agent will actually run, in invocation order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn history(&self) -> &TaskHistory {
        &self.history
    }

    /// Execute a task: write the trace line, record the task, run every tool.
    ///
    /// The task is recorded before any tool runs, so it stays in the history
    /// even when a tool fails and the error aborts the run.
    pub fn execute_task(
        &mut self,
        task_id: &str,
        description: &str,
        out: &mut dyn Write,
    ) -> Result<()> {
        info!(agent = %self.id, task = %task_id, "Executing task");
        writeln!(out, "[{}] Executing task: {}", self.role, description)
            .map_err(CrewError::Output)?;

        self.history.push(task_id);

        for tool in &self.tools {
            debug!(
                agent = %self.id,
                task = %task_id,
                tool = tool.name(),
                "Invoking tool"
            );
            tool.run().map_err(|source| CrewError::Tool {
                agent: self.id.clone(),
                task: task_id.to_string(),
                tool: tool.name().to_string(),
                source,
            })?;
        }

        Ok(())
    }
}
