use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    // Server
    pub http_port: u16,
    pub max_upload_bytes: usize,

    // Gemini
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,

    // Blob storage (optional; empty token switches uploads to inline mode)
    pub blob_read_write_token: String,
    pub blob_store_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let http_port: u16 = env("HTTP_PORT", "8080").parse().context("HTTP_PORT parse")?;
        let max_upload_bytes: usize = env("MAX_UPLOAD_BYTES", "10485760")
            .parse()
            .context("MAX_UPLOAD_BYTES parse")?;

        let gemini_api_key = env("GEMINI_API_KEY", "");
        let gemini_model = env("GEMINI_MODEL", "gemini-2.5-flash");
        let gemini_api_base = env(
            "GEMINI_API_BASE",
            "https://generativelanguage.googleapis.com",
        );

        let blob_read_write_token = env("BLOB_READ_WRITE_TOKEN", "");
        let blob_store_url = env("BLOB_STORE_URL", "https://blob.vercel-storage.com");

        Ok(Self {
            http_port,
            max_upload_bytes,
            gemini_api_key,
            gemini_model,
            gemini_api_base,
            blob_read_write_token,
            blob_store_url,
        })
    }

    pub fn max_upload_mb(&self) -> usize {
        self.max_upload_bytes / (1024 * 1024)
    }

    pub fn masked_api_key(&self) -> String {
        if self.gemini_api_key.is_empty() {
            "not set".to_string()
        } else {
            mask_secret(&self.gemini_api_key, 4, 2)
        }
    }
}

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn mask_secret(s: &str, left: usize, right: usize) -> String {
    if s.len() <= left + right {
        return "*".repeat(s.len());
    }
    format!(
        "{}{}{}",
        &s[..left],
        "*".repeat(s.len() - left - right),
        &s[s.len() - right..]
    )
}
