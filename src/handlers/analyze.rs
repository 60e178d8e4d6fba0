use axum::{extract::State, response::Json};
use chrono::Utc;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::{AnalyzeRequest, AnalyzeResponse, StoredReport};
use crate::services::assessor::AssessError;
use crate::services::image_store;

#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Assessment stored", body = AnalyzeResponse),
        (status = 400, description = "Missing or unusable image reference", body = crate::models::ErrorResponse),
        (status = 500, description = "Model invocation or response failure", body = crate::models::ErrorResponse)
    )
)]
pub async fn analyze_image(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let image_url = request.image_url.unwrap_or_default();
    if image_url.is_empty() {
        return Err(ApiError::Validation("No image URL provided".to_string()));
    }

    let (image, content_type) = resolve_image(&state.http, &image_url).await?;
    tracing::debug!("Resolved image: {} bytes of {}", image.len(), content_type);

    let analysis = state
        .assessor
        .assess(&image, &content_type)
        .await
        .map_err(assess_to_api)?;

    let report_id = Uuid::new_v4().to_string();
    state.reports.store_report(StoredReport {
        id: report_id.clone(),
        image_url,
        analysis: analysis.clone(),
        timestamp: Utc::now(),
    });

    Ok(Json(AnalyzeResponse {
        report_id,
        analysis,
    }))
}

/// Turns the caller's image reference into raw bytes: data URLs decode
/// locally, anything else is fetched.
async fn resolve_image(
    client: &reqwest::Client,
    image_url: &str,
) -> Result<(Vec<u8>, String), ApiError> {
    if image_url.starts_with("data:") {
        let (content_type, bytes) = image_store::parse_data_url(image_url)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        return Ok((bytes, content_type));
    }

    let resp = client.get(image_url).send().await.map_err(|e| {
        tracing::error!("Image fetch failed: {}", e);
        ApiError::Upstream("Analysis failed".to_string())
    })?;
    let status = resp.status();
    if !status.is_success() {
        tracing::error!("Image fetch returned {}", status);
        return Err(ApiError::Upstream("Analysis failed".to_string()));
    }

    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| {
            tracing::error!("Image fetch body failed: {}", e);
            ApiError::Upstream("Analysis failed".to_string())
        })?
        .to_vec();
    Ok((bytes, content_type))
}

fn assess_to_api(err: AssessError) -> ApiError {
    match err {
        AssessError::NotConfigured => {
            tracing::error!("GEMINI_API_KEY not configured");
            ApiError::Upstream("AI service not configured".to_string())
        }
        AssessError::InvalidJson => ApiError::Upstream("Invalid AI response format".to_string()),
        AssessError::Incomplete => ApiError::Upstream("Incomplete analysis data".to_string()),
        other => {
            tracing::error!("Analysis error: {}", other);
            ApiError::Upstream("Analysis failed".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{
        AnalysisResult, FloodIndicators, Hazard, RiskLevel, Severity, StructuralFinding,
        ComponentStatus,
    };
    use crate::reports_memory::InMemoryReports;
    use crate::services::assessor::{Assessor, ModelCatalog};
    use crate::services::image_store::ImageStore;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use std::sync::Arc;

    const DATA_URL: &str = "data:image/png;base64,aGVsbG8=";

    enum StubOutcome {
        Ok(AnalysisResult),
        Incomplete,
        InvalidJson,
    }

    struct StubAssessor {
        outcome: StubOutcome,
    }

    #[async_trait]
    impl Assessor for StubAssessor {
        async fn assess(
            &self,
            _image: &[u8],
            _content_type: &str,
        ) -> Result<AnalysisResult, AssessError> {
            match &self.outcome {
                StubOutcome::Ok(analysis) => Ok(analysis.clone()),
                StubOutcome::Incomplete => Err(AssessError::Incomplete),
                StubOutcome::InvalidJson => Err(AssessError::InvalidJson),
            }
        }

        async fn list_models(&self) -> Result<ModelCatalog, AssessError> {
            Ok(ModelCatalog {
                total: 0,
                generate_content: vec![],
                all_names: vec![],
            })
        }
    }

    fn sample_analysis() -> AnalysisResult {
        AnalysisResult {
            severity: Severity::Critical,
            summary: "Severe flood damage to the ground floor.".to_string(),
            structural_findings: vec![StructuralFinding {
                component: "walls".to_string(),
                status: ComponentStatus::Damaged,
                evidence: "water line at 1.2m".to_string(),
                risk_level: Some(RiskLevel::High),
            }],
            flood_indicators: FloodIndicators::default(),
            hazards: vec![Hazard {
                hazard_type: "Wall collapse risk".to_string(),
                risk: RiskLevel::Critical,
                evidence: "bowing exterior wall".to_string(),
            }],
            repair_estimates: vec![],
            confidence_score: 0.9,
            disclaimer: "Assessment based solely on visible damage.".to_string(),
        }
    }

    fn test_state(outcome: StubOutcome) -> AppState {
        AppState {
            config: Arc::new(Config {
                http_port: 8080,
                max_upload_bytes: 10 * 1024 * 1024,
                gemini_api_key: "test-key".to_string(),
                gemini_model: "gemini-2.5-flash".to_string(),
                gemini_api_base: "http://localhost:0".to_string(),
                blob_read_write_token: String::new(),
                blob_store_url: String::new(),
            }),
            reports: Arc::new(InMemoryReports::new()),
            assessor: Arc::new(StubAssessor { outcome }),
            image_store: Arc::new(ImageStore::Inline),
            http: reqwest::Client::new(),
        }
    }

    #[tokio::test]
    async fn test_analyze_stores_report_and_returns_id() {
        let state = test_state(StubOutcome::Ok(sample_analysis()));
        let request = AnalyzeRequest {
            image_url: Some(DATA_URL.to_string()),
        };

        let Json(body) = analyze_image(State(state.clone()), Json(request))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&body.report_id).is_ok());
        assert_eq!(body.analysis, sample_analysis());

        let stored = state.reports.get_report(&body.report_id).unwrap();
        assert_eq!(stored.image_url, DATA_URL);
        assert_eq!(stored.analysis, sample_analysis());
    }

    #[tokio::test]
    async fn test_analyze_without_image_url_is_rejected() {
        let state = test_state(StubOutcome::Ok(sample_analysis()));
        let err = analyze_image(State(state), Json(AnalyzeRequest { image_url: None }))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No image URL provided");
    }

    #[tokio::test]
    async fn test_analyze_with_empty_image_url_is_rejected() {
        let state = test_state(StubOutcome::Ok(sample_analysis()));
        let err = analyze_image(
            State(state),
            Json(AnalyzeRequest {
                image_url: Some(String::new()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "No image URL provided");
    }

    #[tokio::test]
    async fn test_analyze_malformed_data_url_is_rejected() {
        let state = test_state(StubOutcome::Ok(sample_analysis()));
        let err = analyze_image(
            State(state.clone()),
            Json(AnalyzeRequest {
                image_url: Some("data:image/png,missing-marker".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid data URL format");
        assert!(state.reports.is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_analysis_never_reaches_store() {
        let state = test_state(StubOutcome::Incomplete);
        let err = analyze_image(
            State(state.clone()),
            Json(AnalyzeRequest {
                image_url: Some(DATA_URL.to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Incomplete analysis data");
        assert!(state.reports.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_model_reply_maps_to_format_error() {
        let state = test_state(StubOutcome::InvalidJson);
        let err = analyze_image(
            State(state),
            Json(AnalyzeRequest {
                image_url: Some(DATA_URL.to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid AI response format");
    }

    #[test]
    fn test_assess_error_to_api_mapping() {
        assert_eq!(
            assess_to_api(AssessError::NotConfigured).to_string(),
            "AI service not configured"
        );
        assert_eq!(
            assess_to_api(AssessError::NoText).to_string(),
            "Analysis failed"
        );
        assert_eq!(
            assess_to_api(AssessError::Status {
                status: 503,
                body: "overloaded".to_string()
            })
            .to_string(),
            "Analysis failed"
        );
    }
}
