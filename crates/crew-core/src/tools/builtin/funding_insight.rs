//! Funding insight tool

use anyhow::Result;
use tracing::info;

use crate::tools::Tool;

/// Summarises funding flows available to the response
#[derive(Debug, Default, Clone, Copy)]
pub struct FundingInsightTool;

impl Tool for FundingInsightTool {
    fn name(&self) -> &str {
        "funding_insight_tool"
    }

    fn description(&self) -> &str {
        "Summarises available funding and where it is being allocated"
    }

    fn run(&self) -> Result<()> {
        info!(tool = self.name(), "Analysing funding allocation");
        Ok(())
    }
}
