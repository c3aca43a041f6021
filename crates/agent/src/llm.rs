//! Text-generation collaborator boundary.
//!
//! The collaborator is strictly an advice writer: it never selects catalog
//! records or store items. Structured data is resolved deterministically by
//! the runtime after the reply comes back.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use trellis_core::config::{LlmConfig, LlmProvider};

use crate::session::{ChatTurn, TurnRole};

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String>;
}

/// Fixed-reply client for tests and degraded operation.
pub struct CannedLlmClient {
    reply: String,
}

impl CannedLlmClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl LlmClient for CannedLlmClient {
    async fn complete(&self, _system: &str, _history: &[ChatTurn], _message: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}

/// HTTP client for the configured provider endpoint.
pub struct HttpLlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpLlmClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build llm http client")?;
        Ok(Self { client, config: config.clone() })
    }

    async fn complete_once(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String> {
        match self.config.provider {
            LlmProvider::OpenAi => self.complete_openai(system_prompt, history, message).await,
            LlmProvider::Anthropic => self.complete_anthropic(system_prompt, history, message).await,
            LlmProvider::Ollama => self.complete_ollama(system_prompt, history, message).await,
        }
    }

    async fn complete_openai(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String> {
        let base = self.config.base_url.as_deref().unwrap_or("https://api.openai.com");
        let api_key = self.api_key()?;

        let body: Value = self
            .client
            .post(format!("{base}/v1/chat/completions"))
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.config.model,
                "messages": chat_messages(system_prompt, history, message, true),
            }))
            .send()
            .await
            .context("openai request failed")?
            .error_for_status()
            .context("openai returned an error status")?
            .json()
            .await
            .context("openai response was not json")?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("openai response missing message content"))
    }

    async fn complete_anthropic(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String> {
        let base = self.config.base_url.as_deref().unwrap_or("https://api.anthropic.com");
        let api_key = self.api_key()?;

        let body: Value = self
            .client
            .post(format!("{base}/v1/messages"))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": self.config.model,
                "max_tokens": 512,
                "system": system_prompt,
                "messages": chat_messages(system_prompt, history, message, false),
            }))
            .send()
            .await
            .context("anthropic request failed")?
            .error_for_status()
            .context("anthropic returned an error status")?
            .json()
            .await
            .context("anthropic response was not json")?;

        body["content"][0]["text"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("anthropic response missing text content"))
    }

    async fn complete_ollama(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String> {
        let base = self
            .config
            .base_url
            .as_deref()
            .ok_or_else(|| anyhow!("ollama provider requires llm.base_url"))?;

        let body: Value = self
            .client
            .post(format!("{base}/api/chat"))
            .json(&json!({
                "model": self.config.model,
                "messages": chat_messages(system_prompt, history, message, true),
                "stream": false,
            }))
            .send()
            .await
            .context("ollama request failed")?
            .error_for_status()
            .context("ollama returned an error status")?
            .json()
            .await
            .context("ollama response was not json")?;

        body["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("ollama response missing message content"))
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .ok_or_else(|| anyhow!("llm.api_key is not configured"))
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String> {
        let attempts = self.config.max_retries.saturating_add(1);
        let mut last_error = None;

        for _ in 0..attempts {
            match self.complete_once(system_prompt, history, message).await {
                Ok(reply) => return Ok(reply),
                Err(error) => last_error = Some(error),
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("llm call failed without an error")))
    }
}

/// Wire-format message list: optional leading system turn, then history in
/// order, then the new user message.
fn chat_messages(
    system_prompt: &str,
    history: &[ChatTurn],
    message: &str,
    include_system: bool,
) -> Vec<Value> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    if include_system {
        messages.push(json!({"role": "system", "content": system_prompt}));
    }
    for turn in history {
        let role = match turn.role {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        };
        messages.push(json!({"role": role, "content": turn.content}));
    }
    messages.push(json!({"role": "user", "content": message}));
    messages
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::chat_messages;
    use crate::session::{ChatTurn, TurnRole};

    fn history() -> Vec<ChatTurn> {
        vec![
            ChatTurn { role: TurnRole::User, content: "hello".to_string(), at: Utc::now() },
            ChatTurn { role: TurnRole::Assistant, content: "hi".to_string(), at: Utc::now() },
        ]
    }

    #[test]
    fn messages_carry_system_history_and_new_turn_in_order() {
        let messages = chat_messages("be helpful", &history(), "what now?", true);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "hello");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[3]["role"], "user");
        assert_eq!(messages[3]["content"], "what now?");
    }

    #[test]
    fn system_turn_is_omitted_when_the_provider_takes_it_separately() {
        let messages = chat_messages("be helpful", &history(), "what now?", false);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
    }
}
