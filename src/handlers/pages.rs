use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;

use crate::app_state::AppState;
use crate::render;

pub async fn landing() -> Html<String> {
    Html(render::landing_page())
}

pub async fn analyze(State(state): State<AppState>) -> Html<String> {
    Html(render::analyze_page(state.config.max_upload_mb()))
}

pub async fn report_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Html<String>) {
    match state.reports.get_report(&id) {
        Some(report) => (StatusCode::OK, Html(render::report_page(&report))),
        None => {
            tracing::warn!("Report page requested for unknown id: {}", id);
            (StatusCode::NOT_FOUND, Html(render::report_not_found_page()))
        }
    }
}
