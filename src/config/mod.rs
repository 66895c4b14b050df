//! Runtime configuration
//!
//! Built once at process start from the environment (after loading `.env`) and
//! passed by reference to every component that talks to the remote service.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Name used by older `.env` files
pub const LEGACY_API_KEY_VAR: &str = "API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const DEFAULT_MODEL_VAR: &str = "CHAT_LEDGER_DEFAULT_MODEL";
pub const MODEL_FAMILY_VAR: &str = "CHAT_LEDGER_MODEL_FAMILY";
pub const SUMMARY_LENGTH_VAR: &str = "CHAT_LEDGER_SUMMARY_LENGTH";
pub const EXIT_TOKEN_VAR: &str = "CHAT_LEDGER_EXIT_TOKEN";
pub const WORKBOOK_VAR: &str = "CHAT_LEDGER_WORKBOOK";
pub const TIMEOUT_VAR: &str = "CHAT_LEDGER_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MODEL_FAMILY: &str = "gpt";
pub const DEFAULT_SUMMARY_LENGTH: usize = 10;
pub const DEFAULT_EXIT_TOKEN: &str = "exit()";
pub const DEFAULT_WORKBOOK: &str = "chat_history.xlsx";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Missing credentials are reported by the service on first use
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    pub model_family: String,
    pub summary_length: usize,
    pub exit_token: String,
    pub workbook_path: PathBuf,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            model_family: DEFAULT_MODEL_FAMILY.to_string(),
            summary_length: DEFAULT_SUMMARY_LENGTH,
            exit_token: DEFAULT_EXIT_TOKEN.to_string(),
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!("Failed to load .env file: {}", e);
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup (tests use a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let summary_length = match non_empty(SUMMARY_LENGTH_VAR) {
            Some(raw) => raw.trim().parse::<usize>().with_context(|| {
                format!("{} must be a non-negative integer, got '{}'", SUMMARY_LENGTH_VAR, raw)
            })?,
            None => defaults.summary_length,
        };

        let request_timeout = match non_empty(TIMEOUT_VAR) {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().with_context(|| {
                format!("{} must be a number of seconds, got '{}'", TIMEOUT_VAR, raw)
            })?),
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_key: non_empty(API_KEY_VAR).or_else(|| non_empty(LEGACY_API_KEY_VAR)),
            base_url: non_empty(BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            default_model: non_empty(DEFAULT_MODEL_VAR).unwrap_or(defaults.default_model),
            model_family: non_empty(MODEL_FAMILY_VAR).unwrap_or(defaults.model_family),
            summary_length,
            exit_token: non_empty(EXIT_TOKEN_VAR).unwrap_or(defaults.exit_token),
            workbook_path: non_empty(WORKBOOK_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.workbook_path),
            request_timeout,
        })
    }
}
