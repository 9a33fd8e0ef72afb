use crate::state::{AppState, ErrorMessage, HealthMessage};
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use inference::{InferenceBackend, PredictError, Prediction};
use std::time::Instant;

/// Multipart field carrying the uploaded image.
pub const UPLOAD_FIELD: &str = "file";

/// Every prediction failure surfaces as 500 with `{"error": "..."}`.
pub struct ApiError(pub PredictError);

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorMessage {
            error: self.0.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub async fn predict<B: InferenceBackend + 'static>(
    State(state): State<AppState<B>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let start = Instant::now();

    match predict_upload(&state, multipart).await {
        Ok(prediction) => {
            state
                .metrics
                .record_success(start.elapsed().as_secs_f64(), &prediction.class_name);
            tracing::info!(
                class_name = %prediction.class_name,
                percentage = prediction.percentage,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Prediction served"
            );
            Ok(Json(prediction))
        }
        Err(e) => {
            state
                .metrics
                .record_failure(start.elapsed().as_secs_f64(), e.kind());
            tracing::warn!(error = %e, kind = e.kind().as_str(), "Prediction failed");
            Err(e.into())
        }
    }
}

async fn predict_upload<B: InferenceBackend + 'static>(
    state: &AppState<B>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Prediction, PredictError> {
    let multipart = multipart.map_err(|e| PredictError::unknown(e.body_text()))?;
    let image_bytes = read_upload(multipart).await?;

    // Decode, resize and the model call are CPU-bound
    let predictor = state.predictor.clone();
    tokio::task::spawn_blocking(move || predictor.predict(&image_bytes))
        .await
        .map_err(|e| PredictError::unknown(format!("prediction task failed: {}", e)))?
}

async fn read_upload(mut multipart: Multipart) -> Result<Bytes, PredictError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PredictError::unknown(e.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            tracing::debug!(
                file_name = field.file_name().unwrap_or(""),
                content_type = field.content_type().unwrap_or(""),
                "Reading upload"
            );
            return field
                .bytes()
                .await
                .map_err(|e| PredictError::unknown(e.body_text()));
        }
    }

    Err(PredictError::unknown(format!(
        "missing multipart field `{}`",
        UPLOAD_FIELD
    )))
}

pub async fn health<B: InferenceBackend + 'static>(
    State(state): State<AppState<B>>,
) -> Json<HealthMessage> {
    Json(HealthMessage {
        status: "ok".to_string(),
        model_path: state.model_path.to_string(),
    })
}
