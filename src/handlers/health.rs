use axum::response::Json;

use crate::models::HealthResponse;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "assessment-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
