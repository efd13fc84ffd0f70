//! Error types for loading and running a crew

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrewError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid crew configuration in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("agent '{0}' is defined more than once")]
    DuplicateAgent(String),

    #[error("task '{task}' references unknown agent '{agent}'")]
    UnknownAgent { task: String, agent: String },

    #[error("tool '{tool}' failed while agent '{agent}' executed task '{task}': {source}")]
    Tool {
        agent: String,
        task: String,
        tool: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to write run output: {0}")]
    Output(#[source] std::io::Error),

    #[error("settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, CrewError>;
