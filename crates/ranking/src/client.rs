use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, warn};

use crate::retry::execute_with_retry;
use crate::{RankingConfig, RankingError};

/// A text-completion service that can order candidates.
///
/// The matcher only needs "prompt in, text out"; prompt wording and answer
/// parsing live in [`crate::prompt`].
#[async_trait]
pub trait RankingClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, RankingError>;
}

/// [`RankingClient`] over HTTP with retry and per-request timeouts.
#[derive(Debug, Clone)]
pub struct HttpRankingClient {
    http: reqwest::Client,
    config: RankingConfig,
    token: Option<String>,
}

impl HttpRankingClient {
    pub fn new(config: RankingConfig) -> Result<Self, RankingError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| RankingError::InvalidConfig(format!("http client: {e}")))?;
        let token = config.resolved_token();
        Ok(Self {
            http,
            config,
            token,
        })
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    async fn send_once(&self, prompt: &str) -> Result<Value, RankingError> {
        let payload = json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
        });

        let mut request = self
            .http
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json");
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.json(&payload).send().await.map_err(|e| {
            if e.is_timeout() {
                RankingError::Timeout(self.config.request_timeout.as_millis() as u64)
            } else {
                RankingError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RankingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RankingError::MalformedResponse(format!("invalid JSON body: {e}")))
    }
}

#[async_trait]
impl RankingClient for HttpRankingClient {
    async fn complete(&self, prompt: &str) -> Result<String, RankingError> {
        let start = Instant::now();
        let outcome = execute_with_retry(&self.config.retry, |_| self.send_once(prompt)).await;
        let attempts = outcome.attempts;

        match outcome.into_result() {
            Ok(body) => {
                let answer = extract_answer(body)?;
                debug!(
                    attempts,
                    answer_chars = answer.chars().count(),
                    elapsed_micros = start.elapsed().as_micros() as u64,
                    "ranking_complete"
                );
                Ok(answer)
            }
            Err(err) => {
                warn!(attempts, error = %err, "ranking_request_failed");
                Err(err)
            }
        }
    }
}

/// Pulls the generated text out of the response body.
///
/// Accepts the common completion shapes: a top-level `response`, `text`, or
/// `output` string, a chat-style `message.content`, or
/// `choices[0].message.content` / `choices[0].text`.
pub fn extract_answer(body: Value) -> Result<String, RankingError> {
    let mut map = match body {
        Value::Object(map) => map,
        Value::String(text) => return Ok(text),
        other => {
            return Err(RankingError::MalformedResponse(format!(
                "expected an object, got {other}"
            )))
        }
    };

    for key in ["response", "text", "output"] {
        if let Some(Value::String(text)) = map.remove(key) {
            return Ok(text);
        }
    }

    if let Some(text) = map
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
    {
        return Ok(text.to_string());
    }

    if let Some(first) = map
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
    {
        let text = first
            .get("message")
            .and_then(|message| message.get("content"))
            .or_else(|| first.get("text"))
            .and_then(Value::as_str);
        if let Some(text) = text {
            return Ok(text.to_string());
        }
    }

    Err(RankingError::MalformedResponse(
        "no answer field in response".into(),
    ))
}
