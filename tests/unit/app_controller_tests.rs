/*!
 * Tests for the application controller
 */

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use transcript_digest::app_config::{ProcessingMode, ProviderKind};
use transcript_digest::app_controller::Controller;
use transcript_digest::pipeline::{CancellationFlag, CondenseStatus, JobStatus};
use transcript_digest::providers::mock::MockProvider;

use crate::common;

#[test]
fn test_formatDuration_shouldPickLargestUnits() {
    assert_eq!(Controller::format_duration(Duration::from_millis(3400)), "3.4s");
    assert_eq!(Controller::format_duration(Duration::from_secs(125)), "2m 5s");
    assert_eq!(Controller::format_duration(Duration::from_secs(3723)), "1h 2m 3s");
}

#[test]
fn test_buildProvider_shouldFollowActiveProvider() -> Result<()> {
    let mut config = common::test_config();
    let controller = Controller::with_config(config.clone())?;
    assert_eq!(controller.build_provider().name(), "gemini");

    config.provider.active = ProviderKind::Ollama;
    let controller = Controller::with_config(config)?;
    assert_eq!(controller.build_provider().name(), "ollama");
    Ok(())
}

#[tokio::test]
async fn test_processText_withWorkingProvider_shouldCompleteJob() -> Result<()> {
    let controller = Controller::with_config(common::test_config())?;
    let provider = MockProvider::working();

    let result = controller
        .process_text(common::paragraphs(3, 100), Arc::new(provider.clone()), &CancellationFlag::new(), None)
        .await;

    assert!(result.ok);
    assert_eq!(result.status, JobStatus::Completed);
    assert_eq!(result.chunk_count, 1);
    assert_eq!(result.corrected_text.as_deref(), Some("[CORRECTED]"));
    assert_eq!(result.summary.as_deref(), Some("[SUMMARY]"));
    assert_eq!(result.condense, CondenseStatus::Unchanged);
    assert_eq!(provider.request_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_processText_withSummarizeMode_shouldOmitCorrectedText() -> Result<()> {
    let mut config = common::test_config();
    config.mode = ProcessingMode::Summarize;
    let controller = Controller::with_config(config)?;
    let provider = MockProvider::working().with_custom_response(|_| "Short gist.".to_string());

    let result = controller
        .process_text(common::paragraphs(2, 80), Arc::new(provider.clone()), &CancellationFlag::new(), None)
        .await;

    assert!(result.ok);
    assert!(result.corrected_text.is_none());
    assert_eq!(result.summary.as_deref(), Some("Short gist."));
    assert!(provider.prompts()[0].starts_with("Summarize the following text."));
    Ok(())
}

#[tokio::test]
async fn test_processText_withJapaneseLanguage_shouldUseJapanesePrompt() -> Result<()> {
    let mut config = common::test_config();
    config.language = "ja".to_string();
    config.format = "qa".to_string();
    let controller = Controller::with_config(config)?;
    let provider = MockProvider::working();

    controller
        .process_text("今日は会議の議事録を作成します。".repeat(5), Arc::new(provider.clone()), &CancellationFlag::new(), None)
        .await;

    let prompt = &provider.prompts()[0];
    assert!(prompt.contains("==== 補正テキスト ===="));
    assert!(prompt.contains("「Q:」"));
    Ok(())
}

#[tokio::test]
async fn test_processText_withProgress_shouldReportEveryChunk() -> Result<()> {
    let mut config = common::test_config();
    config.processing.max_chunk_chars = 100;
    let controller = Controller::with_config(config)?;
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = seen.clone();

    let result = controller
        .process_text(
            common::paragraphs(4, 90),
            Arc::new(MockProvider::working()),
            &CancellationFlag::new(),
            Some(Arc::new(move |done: usize, total: usize| sink.lock().push((done, total)))),
        )
        .await;

    assert_eq!(result.chunk_count, 4);
    assert_eq!(*seen.lock(), vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    Ok(())
}
