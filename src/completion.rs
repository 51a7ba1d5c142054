//! Completion client: a trait-abstracted text-generation transport with
//! bounded retry and prompt perturbation.
//!
//! The transport seam ([`CompletionBackend`]) keeps the hosted endpoint's
//! details out of every other component; [`CompletionClient::complete`] is the
//! only surface callers use, and it signals failure with `None`; call sites
//! must treat that as "use fallback", never as fatal.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::EndpointConfig;
use crate::error::{LabError, Result};
use crate::parse;
use crate::prompts;

/// Fixed pause between attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Transport seam for a single generation call.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one request; return the raw response body.
    async fn generate(&self, system_message: &str, prompt: &str) -> Result<String>;
}

/// HTTP backend for the generate-style endpoint: a form POST carrying the
/// bot/template id, a streaming flag, and two role-tagged messages.
pub struct ProtoBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    bot_id: String,
}

impl ProtoBackend {
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(endpoint.timeout_ms))
            .build()
            .map_err(|e| LabError::Completion {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_url: endpoint.api_url.clone(),
            api_key: endpoint.api_key.clone(),
            bot_id: endpoint.bot_id.clone(),
        })
    }
}

#[async_trait]
impl CompletionBackend for ProtoBackend {
    async fn generate(&self, system_message: &str, prompt: &str) -> Result<String> {
        let form = [
            ("_id", self.bot_id.as_str()),
            ("stream", "false"),
            ("message.assistant.0", system_message),
            ("message.user.1", prompt),
        ];

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LabError::Completion {
                message: format!("endpoint returned {status}: {}", body.trim()),
            });
        }

        Ok(response.text().await?)
    }
}

/// Retrying wrapper over a [`CompletionBackend`].
#[derive(Clone)]
pub struct CompletionClient {
    backend: Arc<dyn CompletionBackend>,
    max_retries: u32,
}

impl CompletionClient {
    pub fn new(backend: Arc<dyn CompletionBackend>, max_retries: u32) -> Self {
        Self {
            backend,
            max_retries: max_retries.max(1),
        }
    }

    pub fn from_config(endpoint: &EndpointConfig) -> Result<Self> {
        let backend = ProtoBackend::new(endpoint)?;
        Ok(Self::new(Arc::new(backend), endpoint.max_retries))
    }

    /// Complete with the configured retry budget.
    pub async fn complete(&self, prompt: &str, system_message: &str) -> Option<String> {
        self.complete_with_retries(prompt, system_message, self.max_retries)
            .await
    }

    /// Complete with an explicit retry budget.
    ///
    /// Each retry carries the base prompt prefixed by a freshly-drawn
    /// perspective persona, with a fixed 1-second pause between attempts.
    /// `None` means the budget is exhausted; no error escapes to the caller.
    pub async fn complete_with_retries(
        &self,
        prompt: &str,
        system_message: &str,
        max_retries: u32,
    ) -> Option<String> {
        let attempts = max_retries.max(1);
        for attempt in 0..attempts {
            let attempt_prompt = if attempt == 0 {
                prompt.to_string()
            } else {
                format!("{}\n{prompt}", prompts::random_perspective())
            };

            debug!(attempt = attempt + 1, attempts, "completion attempt");
            match self.backend.generate(system_message, &attempt_prompt).await {
                Ok(raw) => {
                    let text = parse::strip_code_fences(&parse::extract_text(&raw));
                    if !text.is_empty() {
                        return Some(text);
                    }
                    warn!(attempt = attempt + 1, "completion returned no usable payload");
                }
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "completion attempt failed");
                }
            }

            if attempt + 1 < attempts {
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records prompts; answers from a fixed script, then fails.
    struct ScriptedBackend {
        prompts: Mutex<Vec<String>>,
        script: Mutex<Vec<Result<String>>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<String>>) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                script: Mutex::new(script),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn generate(&self, _system_message: &str, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Err(LabError::Completion {
                    message: "script exhausted".to_string(),
                });
            }
            script.remove(0)
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success_is_unprefixed() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(
            r#"{"object": "answer"}"#.to_string()
        )]));
        let client = CompletionClient::new(backend.clone(), 3);

        let result = client.complete("base prompt", "system").await;
        assert_eq!(result.as_deref(), Some("answer"));

        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], "base prompt");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_carry_persona_prefix() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Err(LabError::Completion {
                message: "boom".to_string(),
            }),
            Ok(r#"{"object": "second try"}"#.to_string()),
        ]));
        let client = CompletionClient::new(backend.clone(), 3);

        let result = client.complete("base prompt", "system").await;
        assert_eq!(result.as_deref(), Some("second try"));

        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].ends_with("\nbase prompt"));
        let prefix = prompts[1].strip_suffix("\nbase prompt").unwrap();
        assert!(crate::prompts::PERSPECTIVES.contains(&prefix));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_return_none() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));
        let client = CompletionClient::new(backend.clone(), 3);

        assert!(client.complete("prompt", "system").await.is_none());
        assert_eq!(backend.prompts.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_payload_counts_as_failure() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(
            r#"{"object": ""}"#.to_string()
        )]));
        let client = CompletionClient::new(backend, 1);

        assert!(client.complete("prompt", "system").await.is_none());
    }

    #[tokio::test]
    async fn test_fences_are_stripped_from_payload() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(
            r#"{"object": "```json\n{\"x\": 1}\n```"}"#.to_string(),
        )]));
        let client = CompletionClient::new(backend, 1);

        let result = client.complete("prompt", "system").await;
        assert_eq!(result.as_deref(), Some(r#"{"x": 1}"#));
    }
}
