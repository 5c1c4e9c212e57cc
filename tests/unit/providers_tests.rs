/*!
 * Tests for provider implementations
 */

use transcript_digest::app_config::GenerationConfig;
use transcript_digest::errors::ProviderError;
use transcript_digest::providers::gemini::{Gemini, GeminiRequest, GeminiResponse};
use transcript_digest::providers::mock::MockProvider;
use transcript_digest::providers::ollama::{GenerationResponse, Ollama};
use transcript_digest::providers::{CompletionRequest, Provider};

fn request(prompt: &str) -> CompletionRequest {
    CompletionRequest::with_generation("test-model", prompt, &GenerationConfig::default())
}

#[tokio::test]
async fn test_mockProvider_intermittent_shouldFailEveryNthRequest() {
    let provider = MockProvider::intermittent(3);
    let mut outcomes = Vec::new();
    for _ in 0..6 {
        outcomes.push(provider.complete(request("p")).await.is_ok());
    }
    assert_eq!(outcomes, vec![true, true, false, true, true, false]);
    assert_eq!(provider.request_count(), 6);
}

#[tokio::test]
async fn test_mockProvider_failFirst_shouldRecoverAfterFailures() {
    let provider = MockProvider::fail_first(2);
    assert!(matches!(provider.complete(request("p")).await, Err(ProviderError::ConnectionError(_))));
    assert!(provider.complete(request("p")).await.is_err());
    let response = provider.complete(request("p")).await.unwrap();
    assert!(response.text.contains("==== SUMMARY ===="));
}

#[tokio::test]
async fn test_mockProvider_clones_shouldShareRecordedPrompts() {
    let provider = MockProvider::working();
    let clone = provider.clone();
    clone.complete(request("first")).await.unwrap();
    provider.complete(request("second")).await.unwrap();
    assert_eq!(provider.prompts(), vec!["first".to_string(), "second".to_string()]);
    assert_eq!(clone.request_count(), 2);
}

#[tokio::test]
async fn test_mockProvider_failing_shouldFailConnectionTest() {
    assert!(MockProvider::failing().test_connection().await.is_err());
    assert!(MockProvider::working().test_connection().await.is_ok());
}

#[test]
fn test_completionRequest_withGeneration_shouldCopySettings() {
    let generation = GenerationConfig {
        temperature: 0.7,
        top_k: 10,
        top_p: 0.5,
        max_output_tokens: 256,
    };
    let request = CompletionRequest::with_generation("m", "p", &generation);
    assert_eq!(request.top_k, 10);
    assert_eq!(request.max_output_tokens, 256);
    assert!((request.temperature - 0.7).abs() < f32::EPSILON);
}

#[test]
fn test_geminiRequest_shouldSerializeInCamelCase() {
    let body = serde_json::to_value(GeminiRequest::from_completion(&request("hello"))).unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["generationConfig"]["topK"], 40);
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
}

#[test]
fn test_geminiResponse_shouldReadFirstCandidateText() {
    let body = r#"{
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": "answer" }] }, "finishReason": "STOP" }],
        "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3 }
    }"#;
    let response: GeminiResponse = serde_json::from_str(body).unwrap();
    assert_eq!(response.first_text(), Some("answer"));
    assert_eq!(response.usage_metadata.unwrap().prompt_token_count, Some(12));

    let empty: GeminiResponse = serde_json::from_str("{}").unwrap();
    assert_eq!(empty.first_text(), None);
}

#[test]
fn test_gemini_debug_shouldNotLeakApiKey() {
    let gemini = Gemini::new("secret-key-123", "", "gemini-1.5-pro");
    let debug = format!("{:?}", gemini);
    assert!(!debug.contains("secret-key-123"));
    assert!(gemini.generate_url("gemini-1.5-pro").ends_with("/v1beta/models/gemini-1.5-pro:generateContent"));
}

#[test]
fn test_ollamaResponse_withStreamedBody_shouldConcatenate() {
    let body = "{\"model\":\"llama3\",\"response\":\"Hel\",\"done\":false}\n{\"model\":\"llama3\",\"response\":\"lo\",\"done\":true,\"eval_count\":2}\n";
    let parsed = GenerationResponse::parse(body).unwrap();
    assert_eq!(parsed.response, "Hello");
    assert_eq!(parsed.eval_count, Some(2));
    assert!(GenerationResponse::parse("garbage").is_err());
}

#[test]
fn test_ollama_fromUrl_shouldNormalizeBase() {
    assert_eq!(Ollama::from_url("http://localhost:11434/").base_url(), "http://localhost:11434");
    assert_eq!(Ollama::from_url("").base_url(), "http://localhost:11434");
}

#[tokio::test]
async fn test_ollama_withUnreachableServer_shouldReturnError() {
    let ollama = Ollama::from_url("http://127.0.0.1:9");
    let result = ollama.complete(request("hi")).await;
    assert!(matches!(
        result,
        Err(ProviderError::ConnectionError(_)) | Err(ProviderError::RequestFailed(_))
    ));
}
