use crate::{
    domain::drawing::entity::{AnalysisRecord, DictOfVars},
    infrastructure::imaging::compositor::NormalizedDrawing,
};
use async_trait::async_trait;

/// Interprets a normalized drawing.
///
/// An empty result is a valid answer meaning "nothing recognized"; errors are
/// reserved for failures of the analyzer itself.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        drawing: &NormalizedDrawing,
        dict_of_vars: &DictOfVars,
    ) -> anyhow::Result<Vec<AnalysisRecord>>;
}
