use crate::{
    application::analyze_drawing::{dto::AnalyzeDrawingResponse, use_case::AnalyzeDrawingUseCase},
    domain::drawing::entity::ImageData,
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

/// `POST {route_prefix}`: normalize a drawing and return the analyzer's answer.
pub async fn run(
    State(state): State<AppState>,
    payload: Result<Json<ImageData>, JsonRejection>,
) -> Result<Json<AnalyzeDrawingResponse>, AppError> {
    let Json(data) = payload?;

    let use_case = AnalyzeDrawingUseCase::new(state.analyzer.clone(), state.snapshots.clone());
    let response = use_case.execute(data).await?;

    tracing::debug!(results = response.data.len(), "responses ready");
    Ok(Json(response))
}
