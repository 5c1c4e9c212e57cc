use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Transcript language code (ISO)
    #[serde(default = "default_language")]
    pub language: String,

    /// Summary format key (see `formats`)
    #[serde(default = "default_format")]
    pub format: String,

    /// What the pipeline does with each chunk
    #[serde(default)]
    pub mode: ProcessingMode,

    /// Provider selection and credentials
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Chunking, retry and pacing limits
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Sampling parameters sent with every request
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Processing mode for a job
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Correct recognition errors, then summarize the corrected text
    #[default]
    Correct,
    /// Summarize text that is already clean
    Summarize,
}

impl std::str::FromStr for ProcessingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "correct" => Ok(Self::Correct),
            "summarize" => Ok(Self::Summarize),
            _ => Err(anyhow!("Invalid processing mode: {}", s)),
        }
    }
}

/// Provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Ollama
    Ollama,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,
}

impl ProviderConfig {
    // @param kind: Provider enum
    // @returns: Provider config with defaults
    pub fn new(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Gemini => Self {
                provider_type: "gemini".to_string(),
                model: default_gemini_model(),
                api_key: String::new(),
                endpoint: default_gemini_endpoint(),
            },
            ProviderKind::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
            },
        }
    }
}

/// Provider selection
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderSettings {
    /// Provider to use
    #[serde(default)]
    pub active: ProviderKind,

    /// Available providers
    #[serde(default)]
    pub available: Vec<ProviderConfig>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            active: ProviderKind::default(),
            available: vec![
                ProviderConfig::new(ProviderKind::Gemini),
                ProviderConfig::new(ProviderKind::Ollama),
            ],
        }
    }
}

impl ProviderSettings {
    /// Get the active provider configuration from the available list
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.active)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, kind: &ProviderKind) -> Option<&ProviderConfig> {
        let provider_str = kind.to_lowercase_string();
        self.available.iter().find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider's configuration, created on demand
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.active.to_lowercase_string();
        if let Some(pos) = self.available.iter().position(|p| p.provider_type == provider_str) {
            &mut self.available[pos]
        } else {
            self.available.push(ProviderConfig::new(self.active));
            let last = self.available.len() - 1;
            &mut self.available[last]
        }
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.active {
            ProviderKind::Gemini => default_gemini_model(),
            ProviderKind::Ollama => default_ollama_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.active {
            ProviderKind::Gemini => default_gemini_endpoint(),
            ProviderKind::Ollama => default_ollama_endpoint(),
        }
    }
}

/// Limits and pacing for a pipeline run
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProcessingConfig {
    /// Inputs shorter than this are rejected outright
    #[serde(default = "default_min_input_chars")]
    pub min_input_chars: usize,

    /// Inputs longer than this are pre-filtered to their important parts
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Upper bound for a single chunk sent to the provider
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Additional attempts after the first failed one
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff unit in milliseconds; retry N waits N units
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Delay in milliseconds between consecutive chunks
    #[serde(default = "default_inter_chunk_delay_ms")]
    pub inter_chunk_delay_ms: u64,

    /// Timeout for a single transform call
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Chunks processed at once; 1 keeps the run strictly sequential
    #[serde(default = "default_max_concurrent_chunks")]
    pub max_concurrent_chunks: usize,

    /// Seed for the paragraph sampler, random when absent
    #[serde(default)]
    pub sample_seed: Option<u64>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            min_input_chars: default_min_input_chars(),
            max_input_chars: default_max_input_chars(),
            max_chunk_chars: default_max_chunk_chars(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            inter_chunk_delay_ms: default_inter_chunk_delay_ms(),
            call_timeout_secs: default_call_timeout_secs(),
            max_concurrent_chunks: default_max_concurrent_chunks(),
            sample_seed: None,
        }
    }
}

impl ProcessingConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn inter_chunk_delay(&self) -> Duration {
        Duration::from_millis(self.inter_chunk_delay_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Total attempts per chunk, first try included
    pub fn max_attempts(&self) -> u32 {
        self.retry_count + 1
    }
}

/// Generation parameters for provider requests
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Lower values make output more deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Maximum tokens the model may produce per call
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_format() -> String {
    "standard".to_string()
}

fn default_min_input_chars() -> usize {
    50
}

fn default_max_input_chars() -> usize {
    30_000
}

fn default_max_chunk_chars() -> usize {
    4_000
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // multiplied by the retry number
}

fn default_inter_chunk_delay_ms() -> u64 {
    500
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_chunks() -> usize {
    1
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f32 {
    0.95
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

impl Config {
    /// Load configuration from `path`, writing a default file if none exists
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            warn!("Config file not found at '{}', creating default config.", path.display());
            let config = Config::default();
            let config_json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize default config to JSON")?;
            std::fs::write(path, config_json)
                .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
            Ok(config)
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.language)?;

        let processing = &self.processing;
        if processing.max_chunk_chars == 0 {
            return Err(anyhow!("max_chunk_chars must be greater than zero"));
        }
        if processing.max_input_chars < processing.max_chunk_chars {
            return Err(anyhow!(
                "max_input_chars ({}) must not be smaller than max_chunk_chars ({})",
                processing.max_input_chars,
                processing.max_chunk_chars
            ));
        }
        if processing.max_concurrent_chunks == 0 {
            return Err(anyhow!("max_concurrent_chunks must be at least 1"));
        }
        if processing.call_timeout_secs == 0 {
            return Err(anyhow!("call_timeout_secs must be greater than zero"));
        }

        let endpoint = self.provider.get_endpoint();
        Url::parse(&endpoint).map_err(|e| anyhow!("Invalid provider endpoint '{}': {}", endpoint, e))?;

        // Ollama runs locally without credentials
        if self.provider.active == ProviderKind::Gemini && self.provider.get_api_key().is_empty() {
            return Err(anyhow!("API key is required for the Gemini provider"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            format: default_format(),
            mode: ProcessingMode::default(),
            provider: ProviderSettings::default(),
            processing: ProcessingConfig::default(),
            generation: GenerationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
