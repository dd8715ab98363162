//! Text and image collaborators.
//!
//! The pipeline only sees the [`TextCompleter`] and [`ImageGenerator`]
//! traits. [`OpenAiClient`] implements both against an OpenAI-compatible
//! HTTP API.

use std::time::Duration;

use ideagen_core::{ImageOutcome, ResponseKind};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::{GeneratorConfig, RequestParams};
use crate::error::{GenerateError, Result};

/// One chat completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub kind: ResponseKind,
    pub system: &'a str,
    pub user: &'a str,
    pub params: RequestParams,
}

/// Produces raw text for a prompt.
pub trait TextCompleter: Send + Sync {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String>;
}

/// Produces one image for a visual prompt.
pub trait ImageGenerator: Send + Sync {
    fn generate_image(&self, prompt: &str) -> Result<ImageOutcome>;
}

/// Blocking client for the OpenAI chat completion and image endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
    image_size: String,
    image_quality: String,
}

impl OpenAiClient {
    /// Builds a client from configuration, reading the API key from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`MissingApiKey`](GenerateError::MissingApiKey) when the key is
    /// not set, or [`HttpError`](GenerateError::HttpError) if the HTTP client
    /// cannot be built.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let api_key = config.api.api_key()?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            api_key,
            text_model: config.models.text.clone(),
            image_model: config.models.image.clone(),
            image_size: config.models.image_size.clone(),
            image_quality: config.models.image_quality.clone(),
        })
    }

    fn post(&self, endpoint: &str, body: &Value) -> Result<Value> {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(GenerateError::RateLimited(text));
            }
            return Err(GenerateError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(response.json()?)
    }
}

impl TextCompleter for OpenAiClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String> {
        let body = json!({
            "model": self.text_model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
            "temperature": request.params.temperature,
            "max_tokens": request.params.max_tokens,
        });

        debug!(kind = %request.kind, model = %self.text_model, "Requesting completion");
        let response = self.post("chat/completions", &body)?;
        completion_content(&response)
    }
}

impl ImageGenerator for OpenAiClient {
    fn generate_image(&self, prompt: &str) -> Result<ImageOutcome> {
        let body = json!({
            "model": self.image_model,
            "prompt": prompt,
            "size": self.image_size,
            "quality": self.image_quality,
            "n": 1,
        });

        debug!(model = %self.image_model, "Requesting image");
        let response = self.post("images/generations", &body)?;
        Ok(image_outcome(&response))
    }
}

/// Extracts the first choice's message content. A null content is an empty
/// response, not an error.
fn completion_content(response: &Value) -> Result<String> {
    let message = response
        .pointer("/choices/0/message")
        .ok_or_else(|| GenerateError::InvalidResponse("missing choices[0].message".into()))?;
    Ok(message
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

fn image_outcome(response: &Value) -> ImageOutcome {
    let text = |pointer: &str| {
        response
            .pointer(pointer)
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    ImageOutcome {
        url: text("/data/0/url"),
        revised_prompt: text("/data/0/revised_prompt"),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_content() {
        let response = json!({"choices": [{"message": {"role": "assistant", "content": "1. a"}}]});
        assert_eq!(completion_content(&response).unwrap(), "1. a");
    }

    #[test]
    fn test_null_content_is_empty() {
        let response = json!({"choices": [{"message": {"content": null}}]});
        assert_eq!(completion_content(&response).unwrap(), "");
    }

    #[test]
    fn test_missing_choices_is_invalid() {
        let response = json!({"error": "nope"});
        assert!(matches!(
            completion_content(&response),
            Err(GenerateError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_image_outcome() {
        let response = json!({"data": [{"url": "https://img/1.png", "revised_prompt": "A kiosk"}]});
        let outcome = image_outcome(&response);
        assert_eq!(outcome.url.as_deref(), Some("https://img/1.png"));
        assert_eq!(outcome.revised_prompt.as_deref(), Some("A kiosk"));
        assert!(outcome.is_success());
    }

    #[test]
    fn test_empty_image_data_has_no_url() {
        let outcome = image_outcome(&json!({"data": []}));
        assert_eq!(outcome, ImageOutcome::default());
        assert!(!outcome.is_success());
    }
}
