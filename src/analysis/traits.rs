use crate::analysis::types::{DealAnalysisInput, DealMetrics};
use crate::error::Result;
use async_trait::async_trait;

/// Common trait for deal-economics engines
/// The local calculator and the remote ROI endpoint are interchangeable behind it
#[async_trait]
pub trait DealAnalyzer: Send + Sync {
    /// Compute metrics for one scenario
    async fn analyze(&self, input: &DealAnalysisInput) -> Result<DealMetrics>;

    /// Get the name of the engine
    fn engine_name(&self) -> &'static str;
}
