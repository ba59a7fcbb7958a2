use crate::dtos::UploadResponse;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use tracing::Instrument;

/// Run the index refresh and relay both steps' output.
///
/// The pipeline runs on its own task so that a client hanging up does not
/// abort it halfway. Concurrent uploads are not serialized.
pub async fn upload(State(state): State<AppState>) -> Result<Json<UploadResponse>, AppError> {
    let pipeline = state.pipeline.clone();

    let report = tokio::spawn(async move { pipeline.run().await }.in_current_span())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Index pipeline task did not complete");
            AppError::InternalError(anyhow::anyhow!("Index pipeline task failed: {}", e))
        })??;

    Ok(Json(UploadResponse::from(report)))
}
