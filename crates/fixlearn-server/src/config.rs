//! Runtime configuration.
//!
//! Loaded once at startup from an optional TOML file overlaid with
//! `FIXLEARN_*` environment variables, then checked with
//! [`ServerConfig::validate`] before anything else is built.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use fixlearn_model::{DEFAULT_BASE_URL, DEFAULT_MODEL, ModelConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("missing required configuration value `{0}`")]
  Missing(&'static str),

  #[error("unsupported database_url {0:?}; expected sqlite:<path> or http(s)://")]
  UnsupportedDatabaseUrl(String),
}

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
///
/// Required values default to empty so that [`ServerConfig::validate`] can
/// name the one that is missing.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default)]
  pub database_url:       String,
  pub database_key:       Option<String>,
  #[serde(default)]
  pub ai_api_key:         String,
  #[serde(default)]
  pub api_bearer_token:   String,
  #[serde(default = "default_model_base_url")]
  pub model_base_url:     String,
  #[serde(default = "default_model_name")]
  pub model_name:         String,
  #[serde(default = "default_model_timeout_secs")]
  pub model_timeout_secs: u64,
  /// Pause before the single retry of a network failure.
  #[serde(default = "default_retry_backoff_ms")]
  pub retry_backoff_ms:   u64,
  /// Default page size of the session history endpoint.
  #[serde(default = "default_history_limit")]
  pub history_limit:      usize,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 8001 }
fn default_model_base_url() -> String { DEFAULT_BASE_URL.to_owned() }
fn default_model_name() -> String { DEFAULT_MODEL.to_owned() }
fn default_model_timeout_secs() -> u64 { 60 }
fn default_retry_backoff_ms() -> u64 { 500 }
fn default_history_limit() -> usize { 10 }

/// Where messages are persisted, decoded from `database_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
  SqliteMemory,
  SqliteFile(PathBuf),
  /// Base URL of a PostgREST (e.g. Supabase) endpoint.
  Postgrest(String),
}

impl DatabaseTarget {
  pub fn parse(url: &str) -> Result<Self, ConfigError> {
    if url == "sqlite::memory:" {
      return Ok(Self::SqliteMemory);
    }
    if let Some(path) = url
      .strip_prefix("sqlite://")
      .or_else(|| url.strip_prefix("sqlite:"))
      .filter(|p| !p.is_empty())
    {
      return Ok(Self::SqliteFile(PathBuf::from(path)));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
      return Ok(Self::Postgrest(url.to_owned()));
    }
    Err(ConfigError::UnsupportedDatabaseUrl(url.to_owned()))
  }
}

impl ServerConfig {
  /// Read `path` (if it exists) and overlay `FIXLEARN_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FIXLEARN"))
      .build()?
      .try_deserialize()
  }

  /// Fail fast on missing required values and return the decoded database
  /// target.
  pub fn validate(&self) -> Result<DatabaseTarget, ConfigError> {
    if self.database_url.trim().is_empty() {
      return Err(ConfigError::Missing("database_url"));
    }
    if self.ai_api_key.trim().is_empty() {
      return Err(ConfigError::Missing("ai_api_key"));
    }
    if self.api_bearer_token.trim().is_empty() {
      return Err(ConfigError::Missing("api_bearer_token"));
    }

    let target = DatabaseTarget::parse(self.database_url.trim())?;
    let has_key = self
      .database_key
      .as_deref()
      .is_some_and(|k| !k.trim().is_empty());
    if matches!(target, DatabaseTarget::Postgrest(_)) && !has_key {
      return Err(ConfigError::Missing("database_key"));
    }
    Ok(target)
  }

  pub fn model_config(&self) -> ModelConfig {
    ModelConfig {
      base_url: self.model_base_url.clone(),
      api_key:  self.ai_api_key.clone(),
      model:    self.model_name.clone(),
      timeout:  Duration::from_secs(self.model_timeout_secs),
    }
  }

  pub fn retry_backoff(&self) -> Duration {
    Duration::from_millis(self.retry_backoff_ms)
  }
}
