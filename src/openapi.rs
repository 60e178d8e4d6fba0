use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models::{
    AnalysisResult, AnalyzeRequest, AnalyzeResponse, ComponentStatus, DebrisLevel, ErrorResponse,
    FloodIndicators, Hazard, HealthResponse, ModelCatalogResponse, ModelSummary, RepairEstimate,
    RiskLevel, Severity, StoredReport, StructuralFinding, UploadResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::upload::upload_image,
        crate::handlers::analyze::analyze_image,
        crate::handlers::reports::get_report,
        crate::handlers::diagnostics::test_models,
    ),
    components(
        schemas(
            AnalysisResult,
            AnalyzeRequest,
            AnalyzeResponse,
            ComponentStatus,
            DebrisLevel,
            ErrorResponse,
            FloodIndicators,
            Hazard,
            HealthResponse,
            ModelCatalogResponse,
            ModelSummary,
            RepairEstimate,
            RiskLevel,
            Severity,
            StoredReport,
            StructuralFinding,
            UploadResponse,
        )
    ),
    tags(
        (name = "assessment-service", description = "Flood damage photo assessment")
    )
)]
pub struct ApiDoc;

pub fn routes() -> SwaggerUi {
    let openapi = ApiDoc::openapi();
    SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi)
}
