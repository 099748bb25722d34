use crate::config::LLMConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Something that turns a prompt into an answer
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn get_answer(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    n: u32,
    stop: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

const STOP_SEQUENCES: &[&str] = &["Human:", " AI:"];
const BASE_DELAY_MS: u64 = 1000;
const MAX_DELAY_MS: u64 = 60_000;

/// Exponential backoff before retry `attempt` (1-based), capped at a minute
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2_u64.checked_pow(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    Duration::from_millis(BASE_DELAY_MS.saturating_mul(factor).min(MAX_DELAY_MS))
}

/// Client for the OpenAI text completions endpoint
pub struct OpenAiCompletionClient {
    client: Client,
    api_key: String,
    config: LLMConfig,
}

impl OpenAiCompletionClient {
    pub fn new(api_key: String, config: LLMConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::CompletionService(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionClient {
    async fn get_answer(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest {
            model: &self.config.model,
            prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            n: 1,
            stop: STOP_SEQUENCES,
        };

        let max_retries = self.config.max_retries.max(1);
        let mut last_error = None;

        for attempt in 0..max_retries {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    "[OpenAiCompletionClient] Retrying API call (attempt {}/{}) after {}ms delay",
                    attempt + 1,
                    max_retries,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(self.endpoint())
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!("[OpenAiCompletionClient] HTTP request failed: {}", e);
                    last_error = Some(format!("HTTP request failed: {}", e));
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                tracing::warn!(
                    "[OpenAiCompletionClient] API returned error status {}: {}",
                    status,
                    error_text
                );
                let message = format!("API error {}: {}", status, error_text);
                // Client errors other than rate limiting will not improve on retry
                if status.is_client_error() && status.as_u16() != 429 {
                    return Err(Error::CompletionService(message));
                }
                last_error = Some(message);
                continue;
            }

            let completion = match response.json::<CompletionResponse>().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("[OpenAiCompletionClient] Failed to decode response body: {}", e);
                    last_error = Some(format!("Response decode error: {}", e));
                    continue;
                }
            };

            let answer = completion
                .choices
                .first()
                .map(|c| c.text.trim().to_string())
                .unwrap_or_default();

            if answer.is_empty() {
                return Err(Error::CompletionService("completion returned no text".into()));
            }
            tracing::debug!("[OpenAiCompletionClient] Received {} chars", answer.len());
            return Ok(answer);
        }

        Err(Error::CompletionService(
            last_error.unwrap_or_else(|| "All retry attempts failed".to_string()),
        ))
    }
}

/// Stand-in used when no API key is configured
pub struct MissingApiKey;

#[async_trait]
impl CompletionService for MissingApiKey {
    async fn get_answer(&self, _prompt: &str) -> Result<String> {
        Err(Error::CompletionService(
            "OPENAI_API_KEY environment variable not set".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, max_retries: u32) -> LLMConfig {
        LLMConfig {
            base_url: server.uri(),
            max_retries,
            ..LLMConfig::default()
        }
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(backoff_delay(3), Duration::from_millis(4000));
        assert_eq!(backoff_delay(60), Duration::from_millis(MAX_DELAY_MS));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(MAX_DELAY_MS));
    }

    #[tokio::test]
    async fn test_get_answer_trims_completion_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo-instruct",
                "prompt": "What is Rust?",
                "n": 1,
                "stop": ["Human:", " AI:"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"text": "\n\nA systems programming language.  "}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiCompletionClient::new("test-key".into(), config_for(&server, 1)).unwrap();
        let answer = client.get_answer("What is Rust?").await.unwrap();
        assert_eq!(answer, "A systems programming language.");
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiCompletionClient::new("nope".into(), config_for(&server, 3)).unwrap();
        let err = client.get_answer("hi").await.unwrap_err();
        assert!(matches!(err, Error::CompletionService(ref m) if m.contains("401")));
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(2)
            .mount(&server)
            .await;

        let client = OpenAiCompletionClient::new("k".into(), config_for(&server, 2)).unwrap();
        let err = client.get_answer("hi").await.unwrap_err();
        assert!(matches!(err, Error::CompletionService(ref m) if m.contains("500")));
    }

    #[tokio::test]
    async fn test_empty_completion_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiCompletionClient::new("k".into(), config_for(&server, 1)).unwrap();
        assert!(matches!(
            client.get_answer("hi").await,
            Err(Error::CompletionService(_))
        ));
    }
}
