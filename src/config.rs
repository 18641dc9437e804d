use serde::Deserialize;
use std::path::PathBuf;

use crate::models::DEFAULT_TOP_N;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the cleaned catalog CSV tables
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// PostgreSQL connection URL; history endpoints are disabled without it
    #[serde(default)]
    pub database_url: Option<String>,

    /// Optional JSON file replacing the built-in concern synonym table
    #[serde(default)]
    pub concern_synonyms_path: Option<PathBuf>,

    /// Origins allowed by CORS (comma separated in the environment)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Result count used when a request does not ask for one
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("processed")
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:5174".to_string(),
    ]
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
