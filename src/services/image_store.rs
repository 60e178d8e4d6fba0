use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::Config;

/// Destination for uploaded image bytes. Both modes satisfy the same
/// contract: persist bytes, hand back a reference the analyze flow can
/// resolve later.
pub enum ImageStore {
    /// Durable blob storage, selected when a write token is configured.
    Blob {
        client: reqwest::Client,
        base_url: String,
        token: String,
    },
    /// No credential configured: the image travels back to the caller as a
    /// base64 data URL and nothing is persisted server-side.
    Inline,
}

impl ImageStore {
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        if config.blob_read_write_token.is_empty() {
            ImageStore::Inline
        } else {
            ImageStore::Blob {
                client,
                base_url: config.blob_store_url.trim_end_matches('/').to_string(),
                token: config.blob_read_write_token.clone(),
            }
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            ImageStore::Blob { .. } => "blob",
            ImageStore::Inline => "inline",
        }
    }

    pub async fn persist(&self, filename: &str, content_type: &str, bytes: &[u8]) -> Result<String> {
        match self {
            ImageStore::Inline => Ok(encode_data_url(content_type, bytes)),
            ImageStore::Blob {
                client,
                base_url,
                token,
            } => put_blob(client, base_url, token, filename, content_type, bytes).await,
        }
    }
}

async fn put_blob(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<String> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);

    let res = client
        .put(format!("{}/{}", base_url, filename))
        .headers(headers)
        .body(bytes.to_vec())
        .send()
        .await
        .context("blob upload request failed")?;

    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    if !status.is_success() {
        anyhow::bail!("blob error: status={} body={}", status, truncate(&body));
    }

    let parsed: serde_json::Value =
        serde_json::from_str(&body).context("blob response was not JSON")?;
    parsed
        .get("url")
        .and_then(|u| u.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("blob response missing url field"))
}

pub fn encode_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, BASE64.encode(bytes))
}

/// Splits a `data:<mime>;base64,<payload>` URL into MIME type and raw bytes.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .and_then(|r| r.split_once(";base64,"));
    let Some((content_type, payload)) = rest else {
        anyhow::bail!("Invalid data URL format");
    };
    let bytes = BASE64.decode(payload).context("Invalid data URL format")?;
    Ok((content_type.to_string(), bytes))
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
