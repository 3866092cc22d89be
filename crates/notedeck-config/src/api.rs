use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_token_file() -> PathBuf {
    PathBuf::from(".notedeck-token")
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the notes API, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Where the bearer token is kept between runs
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_file: default_token_file(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        let base_url = env::var("NOTEDECK_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| default_base_url());

        let token_file = env::var("NOTEDECK_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_token_file());

        let timeout_seconds = env::var("NOTEDECK_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Self {
            base_url,
            token_file,
            timeout_seconds,
        }
    }
}
