use crate::dtos::PingResponse;
use axum::{http::Uri, Json};
use service_core::error::AppError;

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::pong())
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}
