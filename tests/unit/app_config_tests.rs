/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::time::Duration;
use transcript_digest::app_config::{Config, LogLevel, ProcessingMode, ProviderKind};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language, "en");
    assert_eq!(config.format, "standard");
    assert_eq!(config.mode, ProcessingMode::Correct);
    assert_eq!(config.provider.active, ProviderKind::Gemini);
    assert_eq!(config.log_level, LogLevel::Info);

    let processing = &config.processing;
    assert_eq!(processing.min_input_chars, 50);
    assert_eq!(processing.max_input_chars, 30_000);
    assert_eq!(processing.max_chunk_chars, 4_000);
    assert_eq!(processing.retry_count, 3);
    assert_eq!(processing.max_attempts(), 4);
    assert_eq!(processing.max_concurrent_chunks, 1);
    assert_eq!(processing.call_timeout(), Duration::from_secs(30));
    assert!(processing.sample_seed.is_none());

    let generation = &config.generation;
    assert!((generation.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(generation.top_k, 40);
    assert!((generation.top_p - 0.95).abs() < f32::EPSILON);
    assert_eq!(generation.max_output_tokens, 1024);
}

#[test]
fn test_config_validation_withGeminiKey_shouldPass() {
    let config = common::test_config();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_withGeminiAndNoKey_shouldFail() {
    let mut config = common::test_config();
    config.provider.active_provider_config_mut().api_key = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_withOllamaAndNoKey_shouldPass() {
    let mut config = Config::default();
    config.provider.active = ProviderKind::Ollama;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_withInvalidLanguage_shouldFail() {
    let mut config = common::test_config();
    config.language = "xyz".to_string();
    assert!(config.validate().is_err());

    config.language = "jpn".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_withInconsistentLimits_shouldFail() {
    let mut config = common::test_config();
    config.processing.max_input_chars = 1_000;
    config.processing.max_chunk_chars = 2_000;
    assert!(config.validate().is_err());

    let mut config = common::test_config();
    config.processing.max_concurrent_chunks = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_withBadEndpoint_shouldFail() {
    let mut config = common::test_config();
    config.provider.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.processing.max_chunk_chars, 4_000);
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.language, config.language);
    assert_eq!(reloaded.provider.get_model(), config.provider.get_model());
    Ok(())
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "language": "ja", "mode": "summarize", "processing": { "max_chunk_chars": 2000, "sample_seed": 42 } }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.language, "ja");
    assert_eq!(config.mode, ProcessingMode::Summarize);
    assert_eq!(config.processing.max_chunk_chars, 2_000);
    assert_eq!(config.processing.sample_seed, Some(42));
    assert_eq!(config.processing.min_input_chars, 50);
    assert_eq!(config.format, "standard");
    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_processingMode_fromStr_shouldParseCaseInsensitively() {
    assert_eq!("Correct".parse::<ProcessingMode>().unwrap(), ProcessingMode::Correct);
    assert_eq!("SUMMARIZE".parse::<ProcessingMode>().unwrap(), ProcessingMode::Summarize);
    assert!("translate".parse::<ProcessingMode>().is_err());
}

#[test]
fn test_providerSettings_withModelOverride_shouldReturnNewModel() {
    let mut config = Config::default();
    config.provider.active = ProviderKind::Ollama;
    config.provider.active_provider_config_mut().model = "mistral".to_string();
    assert_eq!(config.provider.get_model(), "mistral");
}
