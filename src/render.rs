use crate::models::{
    ComponentStatus, DebrisLevel, Hazard, RepairEstimate, RiskLevel, Severity, StoredReport,
    StructuralFinding,
};
use crate::utils::cost::{estimate_cost, total_estimated_cost};

const STYLES: &str = r#"
:root{--bg1:#0f172a;--bg2:#1e293b;--panel:rgba(30,41,59,.55);--line:#334155;--text:#f8fafc;--muted:#94a3b8;--soft:#cbd5e1;--accent:#34d399;--accent-dark:#10b981;--teal:#14b8a6;}
body.light{--bg1:#f8fafc;--bg2:#e2e8f0;--panel:rgba(255,255,255,.85);--line:#cbd5e1;--text:#0f172a;--muted:#64748b;--soft:#334155;}
*{box-sizing:border-box;margin:0;padding:0;}
body{font-family:system-ui,-apple-system,"Segoe UI",sans-serif;color:var(--text);background:linear-gradient(135deg,var(--bg1),var(--bg2),var(--bg1));min-height:100vh;display:flex;flex-direction:column;}
.shell{max-width:1100px;margin:0 auto;padding:0 1.5rem;width:100%;}
header{border-bottom:1px solid var(--line);position:sticky;top:0;background:var(--bg1);z-index:10;}
.header-row{display:flex;align-items:center;justify-content:space-between;padding:1rem 1.5rem;}
.brand{display:flex;align-items:center;gap:.75rem;text-decoration:none;color:var(--text);}
.brand .logo{background:linear-gradient(135deg,var(--accent),var(--teal));border-radius:.5rem;padding:.4rem .55rem;font-size:1.1rem;}
.brand h1{font-size:1.5rem;}
nav{display:flex;align-items:center;gap:1rem;}
.tagline{font-size:.85rem;color:var(--muted);}
main{flex:1;padding:2.5rem 0;}
footer{border-top:1px solid var(--line);margin-top:3rem;}
footer p{text-align:center;color:var(--muted);font-size:.85rem;padding:1.5rem 0;}
h2{font-size:2rem;margin-bottom:.5rem;}
.subtitle{color:var(--muted);margin-bottom:2rem;}
.panel{background:var(--panel);border:1px solid var(--line);border-radius:.75rem;padding:1.5rem;margin-bottom:1.5rem;}
.panel h3{font-size:1.2rem;margin-bottom:1rem;}
.btn{display:inline-block;background:linear-gradient(90deg,var(--accent-dark),var(--teal));color:#fff;border:none;border-radius:.75rem;padding:.75rem 1.5rem;font-size:1rem;font-weight:600;text-decoration:none;cursor:pointer;}
.btn:hover{filter:brightness(1.1);}
.btn-secondary{background:var(--accent-dark);color:#fff;border:none;border-radius:.5rem;padding:.5rem 1rem;cursor:pointer;}
.theme-toggle{background:none;border:1px solid var(--line);border-radius:999px;color:var(--text);padding:.35rem .6rem;cursor:pointer;}
.hero{text-align:center;margin:2rem 0 3rem;}
.hero h2{font-size:2.5rem;}
.hero .lede{color:var(--soft);font-size:1.15rem;max-width:44rem;margin:1rem auto;}
.hero .origin{color:var(--muted);font-style:italic;font-size:.9rem;max-width:38rem;margin:0 auto;}
.cta{text-align:center;margin-bottom:3.5rem;}
.features{display:grid;grid-template-columns:repeat(auto-fit,minmax(240px,1fr));gap:1.5rem;margin-bottom:3rem;}
.steps{display:grid;grid-template-columns:repeat(auto-fit,minmax(160px,1fr));gap:1.5rem;text-align:center;}
.step-number{display:inline-flex;align-items:center;justify-content:center;width:3rem;height:3rem;border-radius:999px;background:linear-gradient(135deg,var(--accent),var(--teal));color:#0f172a;font-weight:700;margin-bottom:.6rem;}
.notice{background:rgba(154,52,18,.18);border:2px solid rgba(194,65,12,.5);border-radius:.75rem;padding:1.5rem;}
.notice h4{color:#fdba74;margin-bottom:.5rem;}
.notice p{color:#fed7aa;font-size:.9rem;line-height:1.5;}
.dropzone{border:3px dashed var(--line);border-radius:.75rem;padding:3rem 1.5rem;text-align:center;cursor:pointer;}
.dropzone:hover{border-color:var(--accent);}
.dropzone .hint{color:var(--muted);font-size:.85rem;margin-top:.5rem;}
.file-name{color:var(--accent);margin-top:1rem;font-weight:600;}
.progress{color:var(--soft);margin-top:1rem;}
.error-box{display:none;background:rgba(127,29,29,.3);border:1px solid #fca5a5;color:#fecaca;border-radius:.5rem;padding:.75rem 1rem;margin-top:1rem;}
.guidelines ul{list-style:none;}
.guidelines li{padding-left:1.2rem;position:relative;margin-bottom:.5rem;color:var(--soft);font-size:.9rem;}
.guidelines li:before{content:"\2022";color:var(--accent);position:absolute;left:0;}
.sev{display:inline-flex;align-items:center;border:2px solid;border-radius:.5rem;padding:.45rem 1rem;font-weight:600;font-size:1.05rem;text-transform:uppercase;}
.confidence{text-align:right;}
.confidence .label{color:var(--muted);font-size:.85rem;}
.confidence .value{color:var(--accent);font-size:1.6rem;font-weight:700;}
.severity-head{display:flex;justify-content:space-between;align-items:flex-start;margin-bottom:1rem;}
.summary{color:var(--soft);line-height:1.6;}
.layout{display:grid;grid-template-columns:1fr 2fr;gap:1.5rem;align-items:start;}
@media(max-width:800px){.layout{grid-template-columns:1fr;}}
.report-image img{width:100%;border-radius:.5rem;border:1px solid var(--line);}
.tile{border:2px solid;border-radius:.5rem;padding:1rem;margin-bottom:.75rem;}
.tile-head{display:flex;justify-content:space-between;align-items:flex-start;margin-bottom:.5rem;gap:.5rem;}
.tile h4{text-transform:capitalize;}
.tile p{font-size:.9rem;}
.badge{font-size:.7rem;text-transform:uppercase;font-weight:600;border-radius:.25rem;padding:.2rem .5rem;white-space:nowrap;}
.dot{display:inline-block;width:.65rem;height:.65rem;border-radius:999px;margin-right:.5rem;}
.tone-ok{background:#ecfdf5;border-color:#a7f3d0;color:#064e3b;}
.badge.tone-ok,.dot.tone-ok{background:#d1fae5;color:#065f46;}
.sev.tone-ok{background:#d1fae5;border-color:#6ee7b7;color:#065f46;}
.tone-warn{background:#fefce8;border-color:#fef08a;color:#713f12;}
.badge.tone-warn,.dot.tone-warn{background:#fef9c3;color:#854d0e;}
.sev.tone-warn{background:#fef9c3;border-color:#fde047;color:#854d0e;}
.tone-high{background:#fff7ed;border-color:#fed7aa;color:#7c2d12;}
.badge.tone-high,.dot.tone-high{background:#ffedd5;color:#9a3412;}
.tone-crit{background:#fef2f2;border-color:#fecaca;color:#7f1d1d;}
.badge.tone-crit,.dot.tone-crit{background:#fee2e2;color:#991b1b;}
.sev.tone-crit{background:#fee2e2;border-color:#fca5a5;color:#991b1b;}
.tone-muted{background:#334155;border-color:#475569;color:#f1f5f9;}
.badge.tone-muted,.dot.tone-muted{background:#475569;color:#f1f5f9;}
.indicators{display:grid;grid-template-columns:repeat(auto-fit,minmax(180px,1fr));gap:1rem;}
.indicator{background:#334155;border:1px solid #475569;border-radius:.5rem;padding:.75rem;}
.indicator .label{font-size:.75rem;color:#94a3b8;margin-bottom:.25rem;}
.indicator .value{font-weight:600;color:#f1f5f9;text-transform:capitalize;}
.indicator.active{background:#ecfdf5;border-color:#a7f3d0;}
.indicator.active .label{color:#059669;}
.indicator.active .value{color:#064e3b;}
.estimates-note{color:var(--muted);font-style:italic;font-size:.85rem;margin-bottom:1rem;}
table{width:100%;border-collapse:collapse;}
th{text-align:left;padding:.75rem 1rem;border-bottom:1px solid var(--line);}
td{padding:.75rem 1rem;border-bottom:1px solid var(--line);}
td.cost{color:var(--accent);font-weight:600;}
td.notes{color:var(--muted);font-size:.85rem;}
tr.total td{border-top:2px solid rgba(16,185,129,.5);border-bottom:none;font-weight:700;}
tr.total td.cost{font-size:1.1rem;}
tr.total .total-label{text-align:right;}
.center-card{text-align:center;max-width:28rem;margin:4rem auto;}
.center-card h2{margin-bottom:.75rem;}
.center-card p{color:var(--muted);margin-bottom:1.5rem;}
"#;

const ANALYZE_SCRIPT: &str = r#"<script>
const fileInput = document.getElementById('file');
const fileName = document.getElementById('file-name');
const analyzeBtn = document.getElementById('analyze-btn');
const progress = document.getElementById('progress');
const errorBox = document.getElementById('error');
const dropzone = document.getElementById('dropzone');

dropzone.addEventListener('click', () => fileInput.click());
dropzone.addEventListener('dragover', (e) => e.preventDefault());
dropzone.addEventListener('drop', (e) => {
  e.preventDefault();
  if (e.dataTransfer.files.length) {
    fileInput.files = e.dataTransfer.files;
    onFileChosen();
  }
});
fileInput.addEventListener('change', onFileChosen);

function onFileChosen() {
  const file = fileInput.files[0];
  if (!file) return;
  if (!file.type.startsWith('image/')) {
    showError('Please upload an image file (JPG, PNG, etc.)');
    return;
  }
  errorBox.style.display = 'none';
  fileName.textContent = file.name;
  analyzeBtn.style.display = 'inline-block';
}

function showError(message) {
  errorBox.textContent = message;
  errorBox.style.display = 'block';
  progress.textContent = '';
  analyzeBtn.disabled = false;
}

analyzeBtn.addEventListener('click', async () => {
  const file = fileInput.files[0];
  if (!file) return;
  analyzeBtn.disabled = true;
  errorBox.style.display = 'none';
  progress.textContent = 'Uploading image...';
  try {
    const formData = new FormData();
    formData.append('file', file);
    const uploadRes = await fetch('/api/upload', { method: 'POST', body: formData });
    const uploadBody = await uploadRes.json();
    if (!uploadRes.ok) throw new Error(uploadBody.error || 'Failed to upload image');

    progress.textContent = 'Analyzing damage with AI...';
    const analyzeRes = await fetch('/api/analyze', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ imageUrl: uploadBody.imageUrl }),
    });
    const analyzeBody = await analyzeRes.json();
    if (!analyzeRes.ok) throw new Error(analyzeBody.error || 'Analysis failed');

    progress.textContent = 'Complete!';
    window.location.href = '/report/' + analyzeBody.reportId;
  } catch (err) {
    showError(err.message || 'An error occurred');
  }
});
</script>"#;

pub fn landing_page() -> String {
    let main = format!(
        r#"<section class="hero">
<h2>Professional Flood Damage<br>Assessment with AI</h2>
<p class="lede">Upload a single photograph and get comprehensive structural analysis, hazard detection, and repair estimates in seconds.</p>
<p class="origin">Built in response to the Swat Valley floods, trusted by disaster response teams and affected communities worldwide.</p>
</section>
<div class="cta"><a class="btn" href="/analyze">Upload &amp; Analyze Image</a></div>
<div class="features">
{f1}{f2}{f3}
</div>
<div class="panel">
<h3 style="text-align:center;font-size:1.6rem;margin-bottom:1.5rem;">Simple 4-Step Process</h3>
<div class="steps">
{s1}{s2}{s3}{s4}
</div>
</div>
<div class="notice">
<p><strong>Important:</strong> FloodScout provides preliminary assessments based on visual analysis only. This tool is not a substitute for professional structural engineering inspections. Always consult certified engineers before making repair decisions.</p>
</div>"#,
        f1 = feature_card(
            "Rapid Analysis",
            "Analyze flood damage in under 10 seconds. No long wait times or complicated processes."
        ),
        f2 = feature_card(
            "Structural Insights",
            "Detect foundation damage, wall displacement, roof integrity, and critical collapse risks with precision."
        ),
        f3 = feature_card(
            "Cost Estimates",
            "Get evidence-based repair material quantities and labor estimates for accurate recovery planning."
        ),
        s1 = step_card("1", "Upload", "Drag and drop your flood damage photo"),
        s2 = step_card("2", "Analyze", "AI processes structural damage"),
        s3 = step_card("3", "Review", "Get detailed findings instantly"),
        s4 = step_card("4", "Report", "Download actionable estimates"),
    );

    page(
        "FloodScout",
        r#"<span class="tagline">Professional Flood Damage Assessment</span>"#,
        &main,
        "Built with Rust and Google Gemini AI &bull; Open Source",
    )
}

pub fn analyze_page(max_upload_mb: usize) -> String {
    let main = format!(
        r#"<div style="text-align:center;">
<h2>Analyze Flood Damage</h2>
<p class="subtitle">Upload a clear photo of the flood-damaged building for instant AI analysis</p>
</div>
<div class="panel">
<div class="dropzone" id="dropzone">
<p><strong>Drop your image here, or click to browse</strong></p>
<p class="hint">Supports: JPG, PNG, WebP (Max {max_mb}MB)</p>
<input type="file" id="file" accept="image/*" style="display:none;">
</div>
<p class="file-name" id="file-name"></p>
<p class="progress" id="progress"></p>
<div class="error-box" id="error"></div>
<button class="btn" id="analyze-btn" style="display:none;width:100%;margin-top:1.5rem;">Analyze Damage</button>
</div>
<div class="panel guidelines">
<h3>For Best Results:</h3>
<ul>
<li>Use clear, well-lit photos showing the entire structure</li>
<li>Capture visible damage including cracks, water lines, and debris</li>
<li>Avoid blurry or heavily filtered images</li>
<li>Include context like surrounding terrain if possible</li>
</ul>
</div>
{script}"#,
        max_mb = max_upload_mb,
        script = ANALYZE_SCRIPT,
    );

    page(
        "Analyze Flood Damage | FloodScout",
        r#"<span class="tagline">Professional Flood Damage Assessment</span>"#,
        &main,
        "FloodScout - Professional Flood Damage Assessment &bull; Not a substitute for professional inspection",
    )
}

pub fn report_page(report: &StoredReport) -> String {
    let analysis = &report.analysis;

    let findings: String = analysis
        .structural_findings
        .iter()
        .map(structural_card)
        .collect();

    let mut hazards = analysis.hazards.clone();
    hazards.sort_by(|a, b| b.risk.cmp(&a.risk));
    let hazards: String = hazards.iter().map(hazard_card).collect();

    let depth = analysis
        .flood_indicators
        .estimated_depth_meters
        .map(|d| format!("{}m", d))
        .unwrap_or_else(|| "Unknown".to_string());
    let indicators = format!(
        "{}{}{}{}",
        indicator_item(
            "Water Line Visible",
            if analysis.flood_indicators.water_line_visible { "Yes" } else { "No" },
            analysis.flood_indicators.water_line_visible,
        ),
        indicator_item(
            "Estimated Depth",
            &depth,
            analysis.flood_indicators.estimated_depth_meters.is_some(),
        ),
        indicator_item(
            "Debris Level",
            analysis.flood_indicators.debris_level.as_str(),
            analysis.flood_indicators.debris_level != DebrisLevel::None,
        ),
        indicator_item(
            "Mud Staining",
            if analysis.flood_indicators.mud_staining { "Present" } else { "Absent" },
            analysis.flood_indicators.mud_staining,
        ),
    );

    let confidence = (analysis.confidence_score * 100.0).round() as i64;

    let main = format!(
        r#"<h2>Flood Damage Assessment Report</h2>
<p class="subtitle">Generated on {generated}</p>
<div class="panel">
<div class="severity-head">
<div><h3>Severity Assessment</h3>{severity}</div>
<div class="confidence"><p class="label">Confidence Score</p><p class="value">{confidence}%</p></div>
</div>
<p class="summary">{summary}</p>
</div>
<div class="layout">
<div class="panel report-image"><h3>Analyzed Image</h3><img src="{image_url}" alt="Flood damage"></div>
<div>
<div class="panel"><h3>Structural Findings</h3>{findings}</div>
<div class="panel"><h3>Flood Indicators</h3><div class="indicators">{indicators}</div></div>
<div class="panel"><h3>Identified Hazards</h3>{hazards}</div>
<div class="panel">
<h3>Repair Cost Estimates</h3>
<p class="estimates-note">Evidence-based heuristic estimates for repair materials</p>
{estimates}
</div>
<div class="notice"><h4>Important Disclaimer</h4><p>{disclaimer}</p></div>
</div>
</div>"#,
        generated = report.timestamp.format("%Y-%m-%d %H:%M UTC"),
        severity = severity_badge(analysis.severity),
        confidence = confidence,
        summary = escape_html(&analysis.summary),
        image_url = escape_html(&report.image_url),
        findings = findings,
        indicators = indicators,
        hazards = hazards,
        estimates = repair_table(&analysis.repair_estimates),
        disclaimer = escape_html(&analysis.disclaimer),
    );

    page(
        "Assessment Report | FloodScout",
        r#"<button class="btn-secondary" onclick="window.print()">Download PDF</button><a class="btn" href="/analyze">New Analysis</a>"#,
        &main,
        "FloodScout - Professional Flood Damage Assessment &bull; Not a substitute for professional inspection",
    )
}

pub fn report_not_found_page() -> String {
    let main = r#"<div class="center-card">
<h2>Report Not Found</h2>
<p>This report does not exist or was lost when the service restarted.</p>
<a class="btn" href="/analyze">Analyze New Image</a>
</div>"#;

    page(
        "Report Not Found | FloodScout",
        r#"<span class="tagline">Professional Flood Damage Assessment</span>"#,
        main,
        "FloodScout - Professional Flood Damage Assessment &bull; Not a substitute for professional inspection",
    )
}

fn page(title: &str, nav: &str, main: &str, footer: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{styles}</style>
</head>
<body>
<header><div class="header-row shell">
<a class="brand" href="/"><span class="logo">&#128737;</span><h1>FloodScout</h1></a>
<nav>{nav}<button class="theme-toggle" onclick="document.body.classList.toggle('light')" aria-label="Toggle theme">&#9788;</button></nav>
</div></header>
<main class="shell">{main}</main>
<footer><div class="shell"><p>{footer}</p></div></footer>
</body>
</html>"#,
        title = escape_html(title),
        styles = STYLES,
        nav = nav,
        main = main,
        footer = footer,
    )
}

fn feature_card(title: &str, description: &str) -> String {
    format!(
        r#"<div class="panel"><h3>{}</h3><p class="summary">{}</p></div>"#,
        title, description
    )
}

fn step_card(number: &str, title: &str, description: &str) -> String {
    format!(
        r#"<div><div class="step-number">{}</div><h4>{}</h4><p class="hint">{}</p></div>"#,
        number, title, description
    )
}

fn severity_badge(severity: Severity) -> String {
    format!(
        r#"<span class="sev {tone}">{label}</span>"#,
        tone = severity_tone(severity),
        label = severity.as_str(),
    )
}

fn structural_card(finding: &StructuralFinding) -> String {
    let tone = finding
        .risk_level
        .map(risk_tone)
        .unwrap_or_else(|| status_tone(finding.status));
    let badge = finding
        .risk_level
        .map(|r| format!(r#"<span class="badge {}">{} risk</span>"#, risk_tone(r), r.as_str()))
        .unwrap_or_default();
    format!(
        r#"<div class="tile {tone}"><div class="tile-head"><h4><span class="dot {status_tone}" title="{status}"></span>{component}</h4>{badge}</div><p>{evidence}</p></div>"#,
        tone = tone,
        status_tone = status_tone(finding.status),
        status = finding.status.as_str(),
        component = escape_html(&finding.component),
        badge = badge,
        evidence = escape_html(&finding.evidence),
    )
}

fn hazard_card(hazard: &Hazard) -> String {
    let tone = risk_tone(hazard.risk);
    format!(
        r#"<div class="tile {tone}"><div class="tile-head"><h4>{name}</h4><span class="badge {tone}">{risk}</span></div><p>{evidence}</p></div>"#,
        tone = tone,
        name = escape_html(&hazard.hazard_type),
        risk = hazard.risk.as_str(),
        evidence = escape_html(&hazard.evidence),
    )
}

fn indicator_item(label: &str, value: &str, highlight: bool) -> String {
    format!(
        r#"<div class="indicator{active}"><p class="label">{label}</p><p class="value">{value}</p></div>"#,
        active = if highlight { " active" } else { "" },
        label = label,
        value = escape_html(value),
    )
}

fn repair_table(estimates: &[RepairEstimate]) -> String {
    let mut rows = String::new();
    for estimate in estimates {
        let cost = estimate_cost(&estimate.material, &estimate.estimated_quantity);
        rows.push_str(&format!(
            r#"<tr><td>{material}</td><td>{quantity}</td><td class="cost">${cost}</td><td class="notes">{notes}</td></tr>"#,
            material = escape_html(&estimate.material),
            quantity = escape_html(&estimate.estimated_quantity),
            cost = format_money(cost),
            notes = escape_html(estimate.notes.as_deref().unwrap_or("-")),
        ));
    }
    let total = format_money(total_estimated_cost(estimates));
    format!(
        r#"<table>
<thead><tr><th>Material</th><th>Estimated Quantity</th><th>Estimated Cost</th><th>Notes</th></tr></thead>
<tbody>{rows}<tr class="total"><td colspan="2" class="total-label">Total Estimated Cost:</td><td class="cost">${total}</td><td></td></tr></tbody>
</table>"#,
        rows = rows,
        total = total,
    )
}

fn severity_tone(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "tone-ok",
        Severity::Medium => "tone-warn",
        Severity::Critical => "tone-crit",
    }
}

fn risk_tone(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Low => "tone-ok",
        RiskLevel::Medium => "tone-warn",
        RiskLevel::High => "tone-high",
        RiskLevel::Critical => "tone-crit",
    }
}

fn status_tone(status: ComponentStatus) -> &'static str {
    match status {
        ComponentStatus::Intact => "tone-ok",
        ComponentStatus::Damaged => "tone-warn",
        ComponentStatus::Critical => "tone-crit",
        ComponentStatus::Unknown => "tone-muted",
    }
}

fn format_money(amount: i64) -> String {
    let digits = amount.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
