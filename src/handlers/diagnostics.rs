use axum::{extract::State, response::Json};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::{ModelCatalogResponse, ModelSummary};
use crate::services::assessor::AssessError;

/// Lists the provider models reachable with the configured key. Meant for
/// checking a deployment, not for end users.
#[utoipa::path(
    get,
    path = "/api/test-models",
    responses(
        (status = 200, description = "Models visible to the configured API key", body = ModelCatalogResponse),
        (status = 500, description = "Key missing or provider unreachable", body = crate::models::ErrorResponse)
    )
)]
pub async fn test_models(
    State(state): State<AppState>,
) -> Result<Json<ModelCatalogResponse>, ApiError> {
    let catalog = state.assessor.list_models().await.map_err(|e| match e {
        AssessError::NotConfigured => {
            ApiError::Upstream("GEMINI_API_KEY not configured".to_string())
        }
        AssessError::Status { status, body } => {
            tracing::error!("Model listing rejected upstream: {} {}", status, body);
            ApiError::Provider {
                status,
                message: format!("API Error: {}", status),
                details: body,
            }
        }
        other => {
            tracing::error!("Model listing failed: {}", other);
            ApiError::Upstream("Failed to list models".to_string())
        }
    })?;

    let available: Vec<ModelSummary> = catalog
        .generate_content
        .iter()
        .map(|m| ModelSummary {
            name: m.name.clone(),
            display_name: m.display_name.clone(),
            version: m.version.clone(),
            methods: m.methods.clone(),
        })
        .collect();

    Ok(Json(ModelCatalogResponse {
        success: true,
        total_models: catalog.total,
        generate_content_models: catalog.generate_content.len(),
        available_models: available,
        all_models: catalog.all_names,
    }))
}
