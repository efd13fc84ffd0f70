//! Public sentiment monitor

use anyhow::Result;
use tracing::info;

use crate::tools::Tool;

#[derive(Debug, Default, Clone, Copy)]
pub struct SentimentMonitor;

impl Tool for SentimentMonitor {
    fn name(&self) -> &str {
        "sentiment_monitor"
    }

    fn description(&self) -> &str {
        "Monitors public sentiment towards the response"
    }

    fn run(&self) -> Result<()> {
        info!(tool = self.name(), "Sampling public sentiment");
        Ok(())
    }
}
