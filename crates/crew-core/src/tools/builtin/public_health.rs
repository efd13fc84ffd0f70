//! Public health indicator tool

use anyhow::Result;
use tracing::info;

use crate::tools::Tool;

/// Reports on public health indicators
#[derive(Debug, Default, Clone, Copy)]
pub struct PublicHealthTool;

impl Tool for PublicHealthTool {
    fn name(&self) -> &str {
        "public_health_tool"
    }

    fn description(&self) -> &str {
        "Collects public health indicators such as case counts and hospital capacity"
    }

    fn run(&self) -> Result<()> {
        info!(tool = self.name(), "Gathering public health indicators");
        Ok(())
    }
}
