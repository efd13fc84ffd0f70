//! Run settings from crew.toml
//!
//! Looked up in the current directory and its parents, then in the user's
//! config directory (~/.config/crew/crew.toml or platform equivalent). When
//! no file exists the defaults point at `crew-ai/agents.yaml` and
//! `crew-ai/tasks.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::YamlFiles;
use crate::error::{CrewError, Result};
use crate::runner::ScheduleMode;

pub const SETTINGS_FILE: &str = "crew.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// Where the crew documents live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_agents_path")]
    pub agents: PathBuf,

    #[serde(default = "default_tasks_path")]
    pub tasks: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub mode: ScheduleMode,

    /// Print tasks that were skipped after the run
    #[serde(default = "default_report_skipped")]
    pub report_skipped: bool,
}

fn default_agents_path() -> PathBuf {
    PathBuf::from("crew-ai/agents.yaml")
}

fn default_tasks_path() -> PathBuf {
    PathBuf::from("crew-ai/tasks.yaml")
}

fn default_report_skipped() -> bool {
    true
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            agents: default_agents_path(),
            tasks: default_tasks_path(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: ScheduleMode::default(),
            report_skipped: default_report_skipped(),
        }
    }
}

impl Settings {
    /// Load settings from the first crew.toml found, or defaults
    pub fn load() -> Result<Self> {
        match Self::find_settings_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a specific path.
    ///
    /// Relative document paths are resolved against the file's directory.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CrewError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut settings: Settings = toml::from_str(&content)
            .map_err(|e| CrewError::Settings(format!("{}: {e}", path.display())))?;

        if let Some(base) = path.parent() {
            settings.paths.agents = base.join(&settings.paths.agents);
            settings.paths.tasks = base.join(&settings.paths.tasks);
        }

        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Find crew.toml in the current directory, its parents, or the user config dir
    pub fn find_settings_path() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::search_upwards(&cwd).or_else(|| {
            let user = Self::user_settings_path()?;
            user.exists().then_some(user)
        })
    }

    fn search_upwards(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        for _ in 0..10 {
            let candidate = current.join(SETTINGS_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Per-user settings location
    pub fn user_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("crew").join(SETTINGS_FILE))
    }

    pub fn source(&self) -> YamlFiles {
        YamlFiles::new(&self.paths.agents, &self.paths.tasks)
    }

    /// Write a commented default crew.toml into `dir`
    pub fn create_default(dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(SETTINGS_FILE);

        if path.exists() {
            return Err(CrewError::Settings(format!(
                "settings file already exists: {}",
                path.display()
            )));
        }

        let default_settings = r#"# crew configuration

[paths]
# Agent definitions (top-level `agents:` list)
agents = "crew-ai/agents.yaml"

# Task definitions (top-level `tasks:` list), run in file order
tasks = "crew-ai/tasks.yaml"

[run]
# "single_pass": walk the task list once; tasks whose dependencies are not
# yet met are skipped for good.
# "until_stable": keep walking the list until a pass runs nothing new.
mode = "single_pass"

# Print tasks that never ran after the run
report_skipped = true
"#;

        fs::write(&path, default_settings).map_err(|source| CrewError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
