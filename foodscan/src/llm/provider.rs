use async_trait::async_trait;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{FoodScanError, Result};
use crate::llm::api::LlmApiClient;
use crate::models::ImagePayload;

/// A model that can look at an image and answer a prompt about it.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Return the raw reply text for one image and prompt pair.
    async fn analyze(
        &self,
        image: &ImagePayload,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String>;

    fn is_available(&self) -> bool;

    /// Short provider label for health reporting.
    fn provider_name(&self) -> String;

    fn model_name(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

impl std::fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmBackend::OpenAI => write!(f, "openai"),
            LlmBackend::OpenRouter => write!(f, "openrouter"),
            LlmBackend::Ollama => write!(f, "ollama"),
            LlmBackend::LmStudio => write!(f, "lmstudio"),
            LlmBackend::OpenAICompatible { .. } => write!(f, "openai-compatible"),
            LlmBackend::Unavailable { .. } => write!(f, "unavailable"),
        }
    }
}

/// Vision model backed by an OpenAI-compatible chat API.
#[derive(Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    client: Option<LlmApiClient>,
}

impl LlmProvider {
    pub fn new(config: &LlmConfig) -> Self {
        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => match &config.base_url {
                Some(base_url) => LlmBackend::OpenAICompatible {
                    base_url: base_url.clone(),
                },
                None => {
                    return Self::unavailable(&format!(
                        "Unknown provider in model: {}",
                        config.model
                    ))
                }
            },
        };

        match LlmApiClient::new(config) {
            Ok(client) => Self {
                backend,
                client: Some(client),
            },
            Err(e) => {
                tracing::warn!(error = %e, model = %config.model, "Vision model not available");
                Self::unavailable(&e.to_string())
            }
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            client: None,
        }
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "Vision model client not initialised".to_string(),
        }
    }
}

#[async_trait]
impl VisionModel for LlmProvider {
    async fn analyze(
        &self,
        image: &ImagePayload,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| FoodScanError::LlmUnavailable(self.unavailable_reason()))?;

        client
            .complete_vision(image, system_prompt, user_prompt)
            .await
    }

    fn is_available(&self) -> bool {
        self.client.is_some() && !matches!(self.backend, LlmBackend::Unavailable { .. })
    }

    fn provider_name(&self) -> String {
        self.backend.to_string()
    }

    fn model_name(&self) -> Option<String> {
        self.client.as_ref().map(|client| client.model().to_string())
    }
}
