use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use service_core::error::AppError;

/// Prometheus scrape endpoint. 404 when no recorder was installed.
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Metrics are not enabled")))?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        handle.render(),
    ))
}
