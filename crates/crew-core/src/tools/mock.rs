//! Recording tool used by unit tests

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use super::{Tool, ToolRegistry};

/// Shared log of tool invocations, in call order
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub struct RecordingTool {
    name: String,
    log: CallLog,
    fail: bool,
}

impl RecordingTool {
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: Arc::clone(log),
            fail: false,
        }
    }

    pub fn failing(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(name, log)
        }
    }
}

impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Records each invocation"
    }

    fn run(&self) -> Result<()> {
        self.log.lock().unwrap().push(self.name.clone());
        if self.fail {
            bail!("{} is unavailable", self.name);
        }
        Ok(())
    }
}

/// Registry with recording stand-ins for the three default tools
pub fn recording_registry(log: &CallLog) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(RecordingTool::new("public_health_tool", log));
    registry.register(RecordingTool::new("funding_insight_tool", log));
    registry.register(RecordingTool::new("sentiment_monitor", log));
    registry
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
