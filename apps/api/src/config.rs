use anyhow::{Context, Result};

use crate::optimize::ranker::DEFAULT_TOP_N;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing — the pipeline itself
/// never reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Number of projects selected for rewriting (request may override).
    pub top_n_projects: usize,
    /// Upper bound on a single generative call, in seconds.
    pub generation_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            top_n_projects: std::env::var("TOP_N_PROJECTS")
                .unwrap_or_else(|_| DEFAULT_TOP_N.to_string())
                .parse::<usize>()
                .context("TOP_N_PROJECTS must be a non-negative integer")?,
            generation_timeout_secs: std::env::var("GENERATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("GENERATION_TIMEOUT_SECS must be a positive integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
