use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use tracing::*;

use super::{OPENAI_API_URL, PROVIDER_TIMEOUT};

const MAX_COMPLETION_TOKENS: u32 = 500;

/// Outcome of one completion attempt. Failures are in-band, the adapter
/// never returns an error to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmOutcome {
    Reply(String),
    NotConfigured,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    api_key: Option<Secret<String>>,
    model: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: Option<Secret<String>>, model: String) -> Self {
        Self::with_base_url(api_key, model, OPENAI_API_URL.to_owned())
    }

    pub fn with_base_url(
        api_key: Option<Secret<String>>,
        model: String,
        base_url: String,
    ) -> Self {
        LlmClient {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    pub async fn respond(&self, transcript: &str, language: &str) -> LlmOutcome {
        let api_key = match &self.api_key {
            Some(key) => key.clone(),
            None => return LlmOutcome::NotConfigured,
        };
        match self.request_completion(&api_key, transcript, language).await {
            Ok(reply) => LlmOutcome::Reply(reply),
            Err(error) => {
                warn!("Completion failed: {:#}", error);
                LlmOutcome::Failed(format!("{:#}", error))
            }
        }
    }

    async fn request_completion(
        &self,
        api_key: &Secret<String>,
        transcript: &str,
        language: &str,
    ) -> anyhow::Result<String> {
        let system_prompt = format!(
            "You are a helpful voice assistant. \
             Always reply in the same language as the user. If the user language is '{}', \
             respond in that language. Keep responses concise and professional.",
            language
        );
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": format!("User said (transcript): {}", transcript)},
            ],
            "max_tokens": MAX_COMPLETION_TOKENS,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .timeout(PROVIDER_TIMEOUT)
            .send()
            .await
            .context("Failed to send completion request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("completion provider returned {}: {}", status, body);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .context("Completion response held no choices")?;
        Ok(choice.message.content.trim().to_owned())
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> Option<Secret<String>> {
        Some(Secret::new(value.to_owned()))
    }

    fn client(key: Option<Secret<String>>, url: String) -> LlmClient {
        LlmClient::with_base_url(key, "gpt-4o-mini".to_owned(), url)
    }

    #[tokio::test]
    async fn missing_credentials_short_circuit() {
        let client = client(None, "http://127.0.0.1:1".to_owned());
        let outcome = client.respond("hello", "en").await;
        assert_eq!(outcome, LlmOutcome::NotConfigured);
    }

    #[tokio::test]
    async fn successful_completion_returns_trimmed_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("Authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices": [{"message": {"role": "assistant", "content": "  How can I help?  "}}]}"#,
            )
            .create_async()
            .await;

        let client = client(secret("test-key"), server.url());
        let outcome = client.respond("hello", "en").await;

        mock.assert_async().await;
        assert_eq!(outcome, LlmOutcome::Reply("How can I help?".to_owned()));
    }

    #[tokio::test]
    async fn provider_error_is_reported_in_band() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = client(secret("test-key"), server.url());
        let outcome = client.respond("hello", "en").await;
        match outcome {
            LlmOutcome::Failed(message) => {
                assert!(message.contains("500"), "message should carry status: {}", message)
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_choice_list_is_a_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let client = client(secret("test-key"), server.url());
        let outcome = client.respond("hello", "en").await;
        assert!(matches!(outcome, LlmOutcome::Failed(_)));
    }
}
