use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::config::Config;
use crate::models::AnalysisResult;

const ASSESSMENT_PROMPT: &str = r#"You are an expert structural engineer and flood damage assessment specialist. Analyze the provided image of a flood-damaged building and provide a comprehensive damage assessment.

Your response MUST be valid JSON following this exact schema:

{
  "severity": "low" | "medium" | "critical",
  "summary": "Brief 2-3 sentence overview of damage",
  "structural_findings": [
    {
      "component": "foundation" | "walls" | "roof" | "windows" | "doors",
      "status": "intact" | "damaged" | "critical" | "unknown",
      "evidence": "What you observe in the image",
      "risk_level": "low" | "medium" | "high"
    }
  ],
  "flood_indicators": {
    "water_line_visible": boolean,
    "estimated_depth_meters": number | null,
    "debris_level": "none" | "light" | "moderate" | "heavy",
    "mud_staining": boolean
  },
  "hazards": [
    {
      "type": "Foundation instability" | "Wall collapse risk" | "Exposed rebar" | "Debris instability" | etc,
      "risk": "low" | "medium" | "high" | "critical",
      "evidence": "Observable evidence from image"
    }
  ],
  "repair_estimates": [
    {
      "material": "Cement" | "Bricks" | "Steel Rods" | "Wood Planks" | "Labor",
      "estimated_quantity": "e.g., 40 bags, 600 units, 20 pieces",
      "notes": "Additional context if needed"
    }
  ],
  "confidence_score": 0.0 to 1.0,
  "disclaimer": "Assessment based solely on visible damage in the provided image. Professional on-site inspection required for accurate structural evaluation."
}

Analysis Guidelines:
1. Base all findings strictly on visible evidence in the image
2. Use "unknown" status when component is not clearly visible
3. Estimate water depth based on visible water lines, staining, or debris patterns
4. Prioritize hazards by immediate safety risk
5. Repair estimates should be evidence-based but clearly marked as heuristic
6. Confidence score should reflect image quality and visibility of damage
7. Always include the disclaimer

Provide ONLY the JSON response, no additional text."#;

#[derive(Debug, Error)]
pub enum AssessError {
    #[error("API key not configured")]
    NotConfigured,
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model http {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no text in model response")]
    NoText,
    #[error("model response was not valid JSON")]
    InvalidJson,
    #[error("analysis missing required fields")]
    Incomplete,
}

#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    pub total: usize,
    pub generate_content: Vec<ModelInfo>,
    pub all_names: Vec<String>,
}

/// Single seam to the vision provider: hand over image bytes, get back a
/// validated assessment. Keeps prompt text and response parsing out of the
/// handlers so a different provider can answer without touching them.
#[async_trait]
pub trait Assessor: Send + Sync {
    async fn assess(&self, image: &[u8], content_type: &str) -> Result<AnalysisResult, AssessError>;

    /// Lists provider models that can serve `assess`, for the diagnostics
    /// endpoint.
    async fn list_models(&self) -> Result<ModelCatalog, AssessError>;
}

pub struct GeminiAssessor {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiAssessor {
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            api_base: config.gemini_api_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Assessor for GeminiAssessor {
    async fn assess(&self, image: &[u8], content_type: &str) -> Result<AnalysisResult, AssessError> {
        if self.api_key.is_empty() {
            return Err(AssessError::NotConfigured);
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );
        let req_body = build_generate_request(content_type, &BASE64.encode(image));

        tracing::debug!("Calling {}:generateContent", self.model);
        let resp = self.client.post(&url).json(&req_body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssessError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        let v: JsonValue = resp.json().await?;
        let text = extract_candidate_text(&v).ok_or(AssessError::NoText)?;
        tracing::debug!("Model answered with {} chars", text.len());
        parse_analysis(&text)
    }

    async fn list_models(&self) -> Result<ModelCatalog, AssessError> {
        if self.api_key.is_empty() {
            return Err(AssessError::NotConfigured);
        }

        let url = format!("{}/v1beta/models?key={}", self.api_base, self.api_key);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssessError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        let v: JsonValue = resp.json().await?;
        let models = v
            .get("models")
            .and_then(|m| m.as_array())
            .cloned()
            .unwrap_or_default();

        let all_names = models
            .iter()
            .filter_map(|m| m.get("name").and_then(|n| n.as_str()))
            .map(str::to_string)
            .collect();

        let generate_content = models
            .iter()
            .filter(|m| supports_generate_content(m))
            .map(|m| ModelInfo {
                name: str_field(m, "name"),
                display_name: str_field(m, "displayName"),
                version: str_field(m, "version"),
                methods: m
                    .get("supportedGenerationMethods")
                    .and_then(|v| v.as_array())
                    .map(|a| {
                        a.iter()
                            .filter_map(|x| x.as_str())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Ok(ModelCatalog {
            total: models.len(),
            generate_content,
            all_names,
        })
    }
}

fn build_generate_request(content_type: &str, image_base64: &str) -> JsonValue {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "text": ASSESSMENT_PROMPT },
                { "inline_data": { "mime_type": content_type, "data": image_base64 } }
            ]
        }]
    })
}

fn extract_candidate_text(v: &JsonValue) -> Option<String> {
    let cands = v.get("candidates")?.as_array()?;
    let first = cands.first()?;
    let content = first.get("content")?;
    let parts = content.get("parts")?.as_array()?;
    for p in parts {
        if let Some(t) = p.get("text").and_then(|x| x.as_str()) {
            return Some(t.to_string());
        }
    }
    None
}

fn supports_generate_content(model: &JsonValue) -> bool {
    model
        .get("supportedGenerationMethods")
        .and_then(|m| m.as_array())
        .map(|ms| ms.iter().any(|x| x.as_str() == Some("generateContent")))
        .unwrap_or(false)
}

fn str_field(v: &JsonValue, key: &str) -> String {
    v.get(key).and_then(|x| x.as_str()).unwrap_or("").to_string()
}

/// Parses the model's free text into an [`AnalysisResult`].
///
/// The model is told to answer with bare JSON but often wraps it in prose or
/// a markdown fence, so the first balanced object is carved out before
/// parsing. An answer without `severity`, `structural_findings` and `hazards`
/// is rejected outright.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AssessError> {
    let candidate = extract_json_object(text).unwrap_or(text);
    let value: JsonValue = serde_json::from_str(candidate).map_err(|_| AssessError::InvalidJson)?;

    for field in ["severity", "structural_findings", "hazards"] {
        if value.get(field).map(|v| v.is_null()).unwrap_or(true) {
            return Err(AssessError::Incomplete);
        }
    }

    let mut analysis: AnalysisResult =
        serde_json::from_value(value).map_err(|_| AssessError::InvalidJson)?;
    analysis.confidence_score = analysis.confidence_score.clamp(0.0, 1.0);
    Ok(analysis)
}

// First balanced {...} block, tracking string literals so braces inside
// evidence text don't end the scan early.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn truncate(s: &str) -> String {
    const MAX: usize = 512;
    if s.len() <= MAX {
        return s.to_string();
    }
    let mut cut = MAX;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskLevel, Severity};

    const MINIMAL: &str = r#"{
        "severity": "critical",
        "structural_findings": [
            {"component": "foundation", "status": "critical", "evidence": "visible cracking"}
        ],
        "hazards": [
            {"type": "Foundation instability", "risk": "critical", "evidence": "tilted slab"}
        ]
    }"#;

    #[test]
    fn test_extract_json_object_plain() {
        assert_eq!(extract_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_extract_json_object_from_markdown_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_json_object_with_trailing_prose() {
        let text = "Here is the assessment: {\"a\": {\"b\": 2}} Let me know if you need more.";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 2}}"));
    }

    #[test]
    fn test_extract_json_object_ignores_braces_in_strings() {
        let text = r#"{"evidence": "water line {approx 1m} on wall"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_extract_json_object_handles_escaped_quotes() {
        let text = r#"{"note": "he said \"stay out\""} trailing"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"note": "he said \"stay out\""}"#)
        );
    }

    #[test]
    fn test_extract_json_object_unbalanced_returns_none() {
        assert_eq!(extract_json_object(r#"{"a": {"b": 1}"#), None);
        assert_eq!(extract_json_object("no object here"), None);
    }

    #[test]
    fn test_parse_analysis_accepts_minimal_payload() {
        let analysis = parse_analysis(MINIMAL).unwrap();
        assert_eq!(analysis.severity, Severity::Critical);
        assert_eq!(analysis.hazards[0].risk, RiskLevel::Critical);
    }

    #[test]
    fn test_parse_analysis_tolerates_surrounding_text() {
        let wrapped = format!("Sure! Here's the JSON you asked for:\n```json\n{}\n```", MINIMAL);
        let analysis = parse_analysis(&wrapped).unwrap();
        assert_eq!(analysis.severity, Severity::Critical);
    }

    #[test]
    fn test_parse_analysis_missing_hazards_is_incomplete() {
        let text = r#"{"severity": "low", "structural_findings": []}"#;
        assert!(matches!(parse_analysis(text), Err(AssessError::Incomplete)));
    }

    #[test]
    fn test_parse_analysis_null_required_field_is_incomplete() {
        let text = r#"{"severity": null, "structural_findings": [], "hazards": []}"#;
        assert!(matches!(parse_analysis(text), Err(AssessError::Incomplete)));
    }

    #[test]
    fn test_parse_analysis_garbage_is_invalid_json() {
        assert!(matches!(
            parse_analysis("the image shows severe flooding"),
            Err(AssessError::InvalidJson)
        ));
    }

    #[test]
    fn test_parse_analysis_bad_enum_is_invalid_json() {
        let text = r#"{"severity": "catastrophic", "structural_findings": [], "hazards": []}"#;
        assert!(matches!(parse_analysis(text), Err(AssessError::InvalidJson)));
    }

    #[test]
    fn test_parse_analysis_clamps_confidence_score() {
        let text = r#"{"severity": "low", "structural_findings": [], "hazards": [], "confidence_score": 3.4}"#;
        let analysis = parse_analysis(text).unwrap();
        assert_eq!(analysis.confidence_score, 1.0);
    }

    #[test]
    fn test_extract_candidate_text_reads_first_text_part() {
        let v = json!({
            "candidates": [{
                "content": { "parts": [ {"inline_data": {}}, {"text": "hello"} ] }
            }]
        });
        assert_eq!(extract_candidate_text(&v), Some("hello".to_string()));
    }

    #[test]
    fn test_extract_candidate_text_empty_response() {
        assert_eq!(extract_candidate_text(&json!({})), None);
        assert_eq!(extract_candidate_text(&json!({"candidates": []})), None);
    }

    #[test]
    fn test_generate_request_embeds_prompt_and_image() {
        let req = build_generate_request("image/png", "QUJD");
        let parts = &req["contents"][0]["parts"];
        assert!(parts[0]["text"].as_str().unwrap().contains("flood damage"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "QUJD");
    }

    #[test]
    fn test_supports_generate_content_filter() {
        let yes = json!({"supportedGenerationMethods": ["generateContent", "countTokens"]});
        let no = json!({"supportedGenerationMethods": ["embedContent"]});
        let missing = json!({});
        assert!(supports_generate_content(&yes));
        assert!(!supports_generate_content(&no));
        assert!(!supports_generate_content(&missing));
    }

    #[test]
    fn test_truncate_cuts_on_char_boundaries() {
        // Byte 512 lands inside a two-byte char when the body starts with one
        // ASCII byte.
        let body = format!("a{}", "é".repeat(300));
        let cut = truncate(&body);
        assert!(cut.ends_with("..."));
        assert!(cut.len() < body.len());

        assert_eq!(truncate("fits"), "fits");
    }
}
