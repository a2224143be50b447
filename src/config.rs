use crate::error::BotError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the generation service
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// OpenAI-compatible API endpoint
    pub api_endpoint: String,
    /// Environment variable name containing the API key
    pub env_var_api_key: String,
    /// Model to use for generating jokes
    pub model: String,
    /// Temperature for response generation (0.0 to 2.0)
    pub temperature: f64,
    /// Maximum tokens for response generation
    pub max_tokens: u32,
    /// Topics a joke may be drawn from when none is supplied
    pub topics: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.openai.com/v1".to_string(),
            env_var_api_key: "OPENAI_API_KEY".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 256,
            topics: [
                "science",
                "politics",
                "AI",
                "celebrities",
                "recent events",
                "affairs",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
        }
    }
}

impl GenerationConfig {
    /// Resolve the API key from the configured environment variable.
    /// Validated once at startup; absence is a configuration error.
    pub fn resolve_api_key(&self) -> Result<String, BotError> {
        std::env::var(&self.env_var_api_key).map_err(|_| {
            BotError::Config(format!(
                "environment variable {} not set",
                self.env_var_api_key
            ))
        })
    }
}

/// Configuration for the safety screen
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Maximum generate/classify rounds before giving up
    pub max_attempts: u32,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

/// A single named rubric criterion with its weight
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Criterion {
    pub name: String,
    pub weight: f64,
}

/// Configuration for the rubric rater
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RubricConfig {
    /// Ordered criteria the joke is scored against
    pub criteria: Vec<Criterion>,
}

impl Default for RubricConfig {
    fn default() -> Self {
        let criteria = [
            ("Humor", 1.0),
            ("Creativity", 0.8),
            ("Timeliness", 0.6),
            ("Tone and style", 0.8),
            ("Delivery style", 0.5),
        ]
        .iter()
        .map(|(name, weight)| Criterion {
            name: name.to_string(),
            weight: *weight,
        })
        .collect();

        Self { criteria }
    }
}

/// Configuration for the binary joke-detector classifier
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Inference endpoint returning [{label, score}] predictions
    pub endpoint: String,
    /// Environment variable name for an optional bearer token
    pub env_var_api_key: String,
    /// Label indicating the text was classified as a joke
    pub positive_label: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            endpoint:
                "https://api-inference.huggingface.co/models/Reggie/muppet-roberta-base-joke_detector"
                    .to_string(),
            env_var_api_key: "HF_API_TOKEN".to_string(),
            positive_label: "LABEL_1".to_string(),
        }
    }
}

impl DetectorConfig {
    /// The detector token is optional; the public inference endpoint accepts
    /// unauthenticated calls at a lower rate.
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var(&self.env_var_api_key).ok()
    }
}

/// Configuration for the interactive stand-up show
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Name the bot announces itself with
    pub name: String,
    /// Comedian roster offered as personas
    pub comedians: Vec<String>,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            name: "Pechonson AI".to_string(),
            comedians: [
                "Luis CK",
                "George Carlin",
                "Jim Gaffigan",
                "Mitch Hedberg",
                "Chris Rock",
                "Patton Oswalt",
                "David Cross",
                "Dane Cook",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

/// Root configuration for both bots
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub safety: SafetyConfig,
    pub rubric: RubricConfig,
    pub detector: DetectorConfig,
    pub show: ShowConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, BotError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BotError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&content).map_err(|e| {
            BotError::Config(format!(
                "failed to parse TOML config {}: {e}",
                path.display()
            ))
        })
    }

    /// Load from a file when a path is given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, BotError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
