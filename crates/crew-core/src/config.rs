//! Crew definitions: agents.yaml and tasks.yaml
//!
//! Both documents wrap a single sequence in one top-level key:
//!
//! ```yaml
//! agents:
//!   - id: epidemiologist
//!     role: Epidemiologist
//!     goal: Track outbreak indicators
//!     tools: [public_health_tool]
//! ```
//!
//! ```yaml
//! tasks:
//!   - id: assess_outbreak
//!     agent: epidemiologist
//!     description: Assess current outbreak levels
//!     depends_on: []
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CrewError, Result};

/// Agent definition as loaded from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    pub role: String,
    pub goal: String,
    /// Tool identifiers this agent may invoke
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,
}

/// Task definition as loaded from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    /// Identifier of the owning agent
    pub agent: String,
    pub description: String,
    /// Task ids that must already be in the owning agent's history
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AgentsDocument {
    agents: Vec<AgentConfig>,
}

#[derive(Debug, Deserialize)]
struct TasksDocument {
    tasks: Vec<TaskConfig>,
}

/// Everything needed for one run: agents plus tasks in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrewDefinition {
    pub agents: Vec<AgentConfig>,
    pub tasks: Vec<TaskConfig>,
}

impl CrewDefinition {
    pub fn new(agents: Vec<AgentConfig>, tasks: Vec<TaskConfig>) -> Self {
        Self { agents, tasks }
    }

    /// Parse both documents from YAML text
    pub fn from_yaml(agents_yaml: &str, tasks_yaml: &str) -> Result<Self> {
        Ok(Self {
            agents: parse_agents(agents_yaml, "agents document")?,
            tasks: parse_tasks(tasks_yaml, "tasks document")?,
        })
    }
}

/// Source of crew definitions
///
/// The runner never touches the filesystem itself; tests hand it an in-memory
/// [`CrewDefinition`] and the CLI hands it [`YamlFiles`].
pub trait ConfigSource {
    fn load(&self) -> Result<CrewDefinition>;
}

impl ConfigSource for CrewDefinition {
    fn load(&self) -> Result<CrewDefinition> {
        Ok(self.clone())
    }
}

/// Loads agents and tasks from two YAML files
#[derive(Debug, Clone)]
pub struct YamlFiles {
    pub agents_path: PathBuf,
    pub tasks_path: PathBuf,
}

impl YamlFiles {
    pub fn new(agents_path: impl Into<PathBuf>, tasks_path: impl Into<PathBuf>) -> Self {
        Self {
            agents_path: agents_path.into(),
            tasks_path: tasks_path.into(),
        }
    }
}

impl ConfigSource for YamlFiles {
    fn load(&self) -> Result<CrewDefinition> {
        let agents = parse_agents(
            &read_file(&self.agents_path)?,
            &self.agents_path.display().to_string(),
        )?;
        let tasks = parse_tasks(
            &read_file(&self.tasks_path)?,
            &self.tasks_path.display().to_string(),
        )?;

        tracing::debug!(
            agents = agents.len(),
            tasks = tasks.len(),
            agents_path = %self.agents_path.display(),
            tasks_path = %self.tasks_path.display(),
            "Loaded crew definition"
        );

        Ok(CrewDefinition { agents, tasks })
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CrewError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_agents(content: &str, origin: &str) -> Result<Vec<AgentConfig>> {
    serde_yaml::from_str::<AgentsDocument>(content)
        .map(|doc| doc.agents)
        .map_err(|source| CrewError::Parse {
            origin: origin.to_string(),
            source,
        })
}

fn parse_tasks(content: &str, origin: &str) -> Result<Vec<TaskConfig>> {
    serde_yaml::from_str::<TasksDocument>(content)
        .map(|doc| doc.tasks)
        .map_err(|source| CrewError::Parse {
            origin: origin.to_string(),
            source,
        })
}
