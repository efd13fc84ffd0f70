//! Built-in tools for crew agents

mod funding_insight;
mod public_health;
mod sentiment_monitor;

pub use funding_insight::FundingInsightTool;
pub use public_health::PublicHealthTool;
pub use sentiment_monitor::SentimentMonitor;

use super::registry::ToolRegistry;

/// Create a registry with all default tools.
///
/// Order matters: agents run their allowed tools in this order.
pub fn create_default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(PublicHealthTool);
    registry.register(FundingInsightTool);
    registry.register(SentimentMonitor);

    registry
}
