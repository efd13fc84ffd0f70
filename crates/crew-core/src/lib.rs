//! crew-core: Shared library for running a crew of agents
//!
//! Provides:
//! - Crew definition loading (agents.yaml, tasks.yaml)
//! - Run settings (crew.toml)
//! - Agents with an append-only task history
//! - An ordered tool registry with the built-in tools
//! - The runner that walks tasks in declaration order

pub mod agent;
pub mod config;
pub mod error;
pub mod runner;
pub mod settings;
pub mod tools;

pub use agent::{Agent, TaskHistory};
pub use config::{AgentConfig, ConfigSource, CrewDefinition, TaskConfig, YamlFiles};
pub use error::{CrewError, Result};
pub use runner::{
    build_agents, AgentRegistry, CrewRun, ExecutedTask, RunReport, Runner, ScheduleMode,
    SkippedTask,
};
pub use settings::Settings;
pub use tools::builtin::create_default_registry;
pub use tools::{Tool, ToolRegistry};
