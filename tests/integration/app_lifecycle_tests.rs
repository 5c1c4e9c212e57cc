/*!
 * Integration tests for the file-in, JSON-out application flow
 */

use anyhow::Result;
use std::sync::Arc;

use transcript_digest::app_controller::Controller;
use transcript_digest::pipeline::CancellationFlag;
use transcript_digest::providers::mock::MockProvider;

use crate::common;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert_eq!(controller.config().processing.max_chunk_chars, 4_000);
    Ok(())
}

#[tokio::test]
async fn test_runWithProvider_withOutputPath_shouldWriteJobJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "talk.txt", &common::paragraphs(3, 80))?;
    let output = temp_dir.path().join("out").join("talk.json");
    let controller = Controller::with_config(common::test_config())?;

    let result = controller
        .run_with_provider(&input, Some(&output), Arc::new(MockProvider::working()), &CancellationFlag::new())
        .await?;

    assert!(result.ok);
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(written["ok"], true);
    assert_eq!(written["status"], "completed");
    assert_eq!(written["corrected_text"], "[CORRECTED]");
    assert_eq!(written["summary"], "[SUMMARY]");
    assert_eq!(written["chunk_count"], 1);
    assert_eq!(written["failed_chunks"], 0);
    assert_eq!(written["extracted"], false);
    assert_eq!(written["format"], "standard");
    assert_eq!(written["condense"], "unchanged");
    assert!(written.get("error").is_none());
    Ok(())
}

#[tokio::test]
async fn test_runWithProvider_withFailingProvider_shouldWriteFailedJob() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "talk.txt", &common::paragraphs(2, 80))?;
    let output = temp_dir.path().join("talk.json");
    let mut config = common::test_config();
    config.processing.retry_count = 1;
    let controller = Controller::with_config(config)?;
    let provider = MockProvider::failing();

    let result = controller
        .run_with_provider(&input, Some(&output), Arc::new(provider.clone()), &CancellationFlag::new())
        .await?;

    assert!(!result.ok);
    assert_eq!(provider.request_count(), 2);
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(written["ok"], false);
    assert_eq!(written["status"], "failed");
    assert!(written["error"].as_str().unwrap().starts_with("All chunk transformations failed"));
    assert!(written.get("summary").is_none());
    Ok(())
}

#[tokio::test]
async fn test_runWithProvider_withShortFile_shouldWriteRejection() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "short.txt", "too short")?;
    let output = temp_dir.path().join("short.json");
    let controller = Controller::with_config(common::test_config())?;
    let provider = MockProvider::working();

    let result = controller
        .run_with_provider(&input, Some(&output), Arc::new(provider.clone()), &CancellationFlag::new())
        .await?;

    assert!(!result.ok);
    assert_eq!(provider.request_count(), 0);
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(written["status"], "rejected");
    assert!(written["error"].as_str().unwrap().starts_with("Input rejected"));
    Ok(())
}

#[tokio::test]
async fn test_runWithProvider_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::test_config())?;

    let result = controller
        .run_with_provider(
            &temp_dir.path().join("missing.txt"),
            None,
            Arc::new(MockProvider::working()),
            &CancellationFlag::new(),
        )
        .await;

    assert!(result.is_err());
    Ok(())
}
