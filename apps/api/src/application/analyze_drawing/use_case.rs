use super::dto::AnalyzeDrawingResponse;
use crate::{
    domain::drawing::{
        entity::{DictOfVars, ImageData},
        errors::DrawingError,
        value_objects::Palette,
    },
    infrastructure::{
        imaging::{
            compositor::{NormalizedDrawing, normalize},
            decoder::{decode_payload, materialize},
        },
        ml::traits::ImageAnalyzer,
        storage::traits::SnapshotStore,
    },
};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Runs one drawing submission from raw payload to analyzer answer.
///
/// # Pipeline
/// 1. Decode the base64 payload (data URI prefix optional)
/// 2. Parse the image bytes
/// 3. Pick a background contrasting with `strokeColor`
/// 4. Flatten transparency onto that background
/// 5. Save the normalized PNG snapshot
/// 6. Hand the image and variables to the analyzer
///
/// Steps 1-5 fail with [`DrawingError::InvalidDrawingData`]; step 6 with
/// [`DrawingError::AnalysisEmptyResult`] or [`DrawingError::AnalysisError`].
pub struct AnalyzeDrawingUseCase {
    analyzer: Arc<dyn ImageAnalyzer>,
    snapshots: Arc<dyn SnapshotStore>,
}

struct PreparedDrawing {
    drawing: NormalizedDrawing,
    palette: Palette,
}

impl AnalyzeDrawingUseCase {
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>, snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self {
            analyzer,
            snapshots,
        }
    }

    #[instrument(skip(self, request), fields(
        payload_len = request.image.len(),
        vars = request.dict_of_vars.len()
    ))]
    pub async fn execute(
        &self,
        request: ImageData,
    ) -> Result<AnalyzeDrawingResponse, DrawingError> {
        let ImageData {
            image,
            dict_of_vars,
        } = request;
        debug!(?dict_of_vars, "received drawing variables");

        let normalized = self.decode_stage(image, &dict_of_vars).await?;
        let drawing = extracted(normalized).ok_or(DrawingError::DrawingExtractionFailed)?;

        let records = self
            .analyzer
            .analyze(&drawing, &dict_of_vars)
            .await
            .map_err(|e| {
                error!("Analyzer failed: {:#}", e);
                DrawingError::AnalysisError(format!("{:#}", e))
            })?;

        if records.is_empty() {
            warn!("Analyzer returned no results");
            return Err(DrawingError::AnalysisEmptyResult);
        }

        debug!(?records, "analysis complete");
        Ok(AnalyzeDrawingResponse::success(records))
    }

    async fn decode_stage(
        &self,
        image: String,
        dict_of_vars: &DictOfVars,
    ) -> Result<NormalizedDrawing, DrawingError> {
        let vars = dict_of_vars.clone();
        let prepared = tokio::task::spawn_blocking(move || prepare(&image, &vars))
            .await
            .map_err(DrawingError::invalid)??;

        debug!(
            stroke = %prepared.palette.stroke,
            luminance = prepared.palette.stroke.luminance(),
            background = %prepared.palette.background,
            width = prepared.drawing.image.width(),
            height = prepared.drawing.image.height(),
            "drawing normalized"
        );

        self.snapshots
            .save(&prepared.drawing.png)
            .await
            .map_err(|e| DrawingError::invalid(format!("{:#}", e)))?;

        Ok(prepared.drawing)
    }
}

fn prepare(image: &str, dict_of_vars: &DictOfVars) -> Result<PreparedDrawing, DrawingError> {
    let bytes = decode_payload(image)?;
    let decoded = materialize(&bytes)?;
    let palette = Palette::from_vars(dict_of_vars).map_err(DrawingError::invalid)?;
    let drawing = NormalizedDrawing::new(normalize(&decoded, palette.background))
        .map_err(DrawingError::invalid)?;
    Ok(PreparedDrawing { drawing, palette })
}

fn extracted(drawing: NormalizedDrawing) -> Option<NormalizedDrawing> {
    (!drawing.is_empty()).then_some(drawing)
}
