use crate::domain::drawing::entity::AnalysisRecord;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalyzeDrawingResponse {
    pub message: String,
    pub data: Vec<AnalysisRecord>,
    pub status: String,
}

impl AnalyzeDrawingResponse {
    pub fn success(data: Vec<AnalysisRecord>) -> Self {
        Self {
            message: "Image processed".to_string(),
            data,
            status: "success".to_string(),
        }
    }
}
