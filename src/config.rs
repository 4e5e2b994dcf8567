use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub ai: AiSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

/// External AI matching service; disabled by default.
#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_ai_url")]
    pub url: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

fn default_ai_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_ai_timeout() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default = "default_match_limit")]
    pub default_limit: i32,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            default_limit: default_match_limit(),
        }
    }
}

fn default_min_score() -> f64 {
    0.6
}

fn default_match_limit() -> i32 {
    10
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_mbti_weight")]
    pub mbti: f64,
    #[serde(default = "default_interests_weight")]
    pub interests: f64,
    #[serde(default = "default_personality_weight")]
    pub personality: f64,
    #[serde(default = "default_ideal_type_weight")]
    pub ideal_type: f64,
    #[serde(default = "default_department_weight")]
    pub department: f64,
    #[serde(default = "default_age_weight")]
    pub age: f64,
    #[serde(default = "default_height_weight")]
    pub height: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            mbti: default_mbti_weight(),
            interests: default_interests_weight(),
            personality: default_personality_weight(),
            ideal_type: default_ideal_type_weight(),
            department: default_department_weight(),
            age: default_age_weight(),
            height: default_height_weight(),
        }
    }
}

fn default_mbti_weight() -> f64 { 0.25 }
fn default_interests_weight() -> f64 { 0.20 }
fn default_personality_weight() -> f64 { 0.20 }
fn default_ideal_type_weight() -> f64 { 0.15 }
fn default_department_weight() -> f64 { 0.10 }
fn default_age_weight() -> f64 { 0.05 }
fn default_height_weight() -> f64 { 0.05 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with UNIMEET__)
    ///    e.g., UNIMEET__SERVER__PORT -> server.port
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("UNIMEET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        // DATABASE_URL wins over everything else, matching deploy conventions
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("UNIMEET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
