use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// User supplied symbolic variables sent alongside a drawing.
///
/// Only `strokeColor` is inspected by the server; every other entry is handed
/// to the analyzer untouched.
pub type DictOfVars = BTreeMap<String, serde_json::Value>;

/// Key of the stroke color entry inside [`DictOfVars`].
pub const STROKE_COLOR_KEY: &str = "strokeColor";

/// Request payload of the calculator endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImageData {
    /// Either a data URI (`data:image/png;base64,...`) or a raw base64 string.
    pub image: String,

    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub dict_of_vars: DictOfVars,
}

/// One answer produced by the analyzer for a drawn expression.
///
/// When `assign` is true the client stores `expr = result` as a variable and
/// sends it back on later submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalysisRecord {
    pub expr: String,
    pub result: String,
    #[serde(default)]
    pub assign: bool,
}

impl AnalysisRecord {
    pub fn new(expr: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            result: result.into(),
            assign: false,
        }
    }

    pub fn assignment(expr: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            assign: true,
            ..Self::new(expr, result)
        }
    }
}
