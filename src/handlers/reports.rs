use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::StoredReport;

#[utoipa::path(
    get,
    path = "/api/report/{id}",
    params(
        ("id" = String, Path, description = "Report identifier returned by analyze")
    ),
    responses(
        (status = 200, description = "Stored report", body = StoredReport),
        (status = 404, description = "Unknown report id", body = crate::models::ErrorResponse)
    )
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredReport>, ApiError> {
    match state.reports.get_report(&id) {
        Some(report) => Ok(Json(report)),
        None => Err(ApiError::NotFound("Report not found".to_string())),
    }
}
