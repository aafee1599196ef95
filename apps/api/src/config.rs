use anyhow::{Context, Result};

use crate::knowledge::matching::MatchConfig;

/// Default assistant reply when no knowledge entry clears the match threshold.
const DEFAULT_FALLBACK_MESSAGE: &str =
    "I don't have a specific answer for that yet. Could you rephrase, or ask about \
     our mission, products, or community?";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Minimum final score for a knowledge entry to answer a query.
    pub match_threshold: f64,
    /// Weight of the priority nudge on the final score.
    pub priority_boost_weight: f64,
    /// Reply used when no entry clears the threshold.
    pub fallback_message: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            match_threshold: env_f64("MATCH_THRESHOLD", 0.3)?,
            priority_boost_weight: env_f64("PRIORITY_BOOST_WEIGHT", 0.1)?,
            fallback_message: std::env::var("FALLBACK_MESSAGE")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_MESSAGE.to_string()),
        })
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            threshold: self.match_threshold,
            priority_boost_weight: self.priority_boost_weight,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_f64(key: &str, default: f64) -> Result<f64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("{key} must be a valid number")),
        Err(_) => Ok(default),
    }
}
