use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Intact,
    Damaged,
    Critical,
    Unknown,
}

impl ComponentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Intact => "intact",
            ComponentStatus::Damaged => "damaged",
            ComponentStatus::Critical => "critical",
            ComponentStatus::Unknown => "unknown",
        }
    }
}

// Variants are declared lowest to highest so Ord can drive risk sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DebrisLevel {
    #[default]
    None,
    Light,
    Moderate,
    Heavy,
}

impl DebrisLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebrisLevel::None => "none",
            DebrisLevel::Light => "light",
            DebrisLevel::Moderate => "moderate",
            DebrisLevel::Heavy => "heavy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StructuralFinding {
    pub component: String,
    pub status: ComponentStatus,
    #[serde(default)]
    pub evidence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FloodIndicators {
    #[serde(default)]
    pub water_line_visible: bool,
    #[serde(default)]
    pub estimated_depth_meters: Option<f64>,
    #[serde(default)]
    pub debris_level: DebrisLevel,
    #[serde(default)]
    pub mud_staining: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hazard {
    #[serde(rename = "type")]
    pub hazard_type: String,
    pub risk: RiskLevel,
    #[serde(default)]
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepairEstimate {
    pub material: String,
    #[serde(default)]
    pub estimated_quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Structured damage assessment produced by the vision model.
///
/// `severity`, `structural_findings` and `hazards` are mandatory; everything
/// else defaults when the model leaves it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub severity: Severity,
    #[serde(default)]
    pub summary: String,
    pub structural_findings: Vec<StructuralFinding>,
    #[serde(default)]
    pub flood_indicators: FloodIndicators,
    pub hazards: Vec<Hazard>,
    #[serde(default)]
    pub repair_estimates: Vec<RepairEstimate>,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub disclaimer: String,
}

/// Immutable pairing of an uploaded image with its analysis, kept in memory
/// for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredReport {
    pub id: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub analysis: AnalysisResult,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    #[serde(rename = "reportId")]
    pub report_id: String,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelSummary {
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub version: String,
    pub methods: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelCatalogResponse {
    pub success: bool,
    #[serde(rename = "totalModels")]
    pub total_models: usize,
    #[serde(rename = "generateContentModels")]
    pub generate_content_models: usize,
    #[serde(rename = "availableModels")]
    pub available_models: Vec<ModelSummary>,
    #[serde(rename = "allModels")]
    pub all_models: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_result_accepts_minimal_payload() {
        let raw = r#"{
            "severity": "medium",
            "structural_findings": [
                {"component": "walls", "status": "damaged", "evidence": "cracks above water line"}
            ],
            "hazards": [
                {"type": "electrical", "risk": "high", "evidence": "submerged outlet"}
            ]
        }"#;
        let analysis: AnalysisResult = serde_json::from_str(raw).unwrap();
        assert_eq!(analysis.severity, Severity::Medium);
        assert_eq!(analysis.summary, "");
        assert_eq!(analysis.flood_indicators.debris_level, DebrisLevel::None);
        assert!(analysis.repair_estimates.is_empty());
        assert_eq!(analysis.confidence_score, 0.0);
        assert_eq!(analysis.hazards[0].hazard_type, "electrical");
        assert_eq!(analysis.hazards[0].risk, RiskLevel::High);
    }

    #[test]
    fn test_analysis_result_rejects_unknown_enum_value() {
        let raw = r#"{
            "severity": "apocalyptic",
            "structural_findings": [],
            "hazards": []
        }"#;
        assert!(serde_json::from_str::<AnalysisResult>(raw).is_err());
    }

    #[test]
    fn test_hazard_type_round_trips_as_type() {
        let hazard = Hazard {
            hazard_type: "gas leak".to_string(),
            risk: RiskLevel::Critical,
            evidence: "strong odor reported".to_string(),
        };
        let json = serde_json::to_value(&hazard).unwrap();
        assert_eq!(json["type"], "gas leak");
        assert_eq!(json["risk"], "critical");
    }

    #[test]
    fn test_risk_level_orders_low_to_critical() {
        assert!(RiskLevel::Critical > RiskLevel::High);
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
    }

    #[test]
    fn test_stored_report_serializes_camel_case_image_url() {
        let report = StoredReport {
            id: "abc".to_string(),
            image_url: "https://example.com/img.jpg".to_string(),
            analysis: AnalysisResult {
                severity: Severity::Low,
                summary: String::new(),
                structural_findings: vec![],
                flood_indicators: FloodIndicators::default(),
                hazards: vec![],
                repair_estimates: vec![],
                confidence_score: 0.5,
                disclaimer: String::new(),
            },
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn test_error_response_omits_absent_details() {
        let plain = serde_json::to_value(&ErrorResponse {
            error: "Report not found".to_string(),
            details: None,
        })
        .unwrap();
        assert!(plain.get("details").is_none());

        let relayed = serde_json::to_value(&ErrorResponse {
            error: "API Error: 429".to_string(),
            details: Some("quota exceeded".to_string()),
        })
        .unwrap();
        assert_eq!(relayed["details"], "quota exceeded");
    }
}
