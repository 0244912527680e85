use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse, ImageDetail, ImageUrlArgs,
    },
    Client,
};

use crate::{
    config::{parse_llm_provider_model, LlmConfig},
    error::{FoodScanError, Result},
    models::ImagePayload,
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
    max_retries: u32,
    max_tokens: u32,
}

/// OpenAI-compatible chat client for image + text prompts.
#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_config = ApiConfig::from_llm_config(config);

        let (provider, _) = parse_llm_provider_model(&config.model);
        let needs_api_key = !matches!(
            provider.to_lowercase().as_str(),
            "ollama" | "local" | "lmstudio"
        );

        if needs_api_key && api_config.api_key.is_none() {
            return Err(FoodScanError::LlmUnavailable(
                "API key required for this provider".to_string(),
            ));
        }

        let openai_config = OpenAIConfig::new()
            .with_api_base(api_config.base_url.clone())
            .with_api_key(api_config.api_key.clone().unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_config.timeout_secs))
            .build()
            .map_err(|error| {
                FoodScanError::Internal(format!("Failed to create LLM HTTP client: {error}"))
            })?;

        // async-openai retries transient failures on its own; keep that inside
        // our retry budget so a zero budget means a single HTTP call.
        let max_elapsed = if api_config.max_retries == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(api_config.timeout_secs)
        };
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(max_elapsed),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: api_config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Send one image with a system and user prompt, returning the reply text.
    pub async fn complete_vision(
        &self,
        image: &ImagePayload,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String> {
        let request = self.build_vision_request(image, system_prompt, user_prompt)?;
        let mut last_error: Option<FoodScanError> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay_ms = 100 * 2_u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                tracing::debug!(attempt, "Retrying vision completion");
            }

            match self.client.chat().create(request.clone()).await {
                Ok(response) => return Self::extract_content(response),
                Err(error) => {
                    if let Some(rate_limit_error) = Self::rate_limit_error(&error) {
                        return Err(rate_limit_error);
                    }

                    if let Some(auth_error) = Self::auth_error(&error) {
                        return Err(auth_error);
                    }

                    let retryable = Self::is_retryable(&error);
                    let mapped_error = Self::map_openai_error(error);

                    if retryable && attempt < self.config.max_retries {
                        last_error = Some(mapped_error);
                        continue;
                    }

                    return Err(mapped_error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            FoodScanError::Llm("Vision completion failed after retries".to_string())
        }))
    }

    // max_tokens is deprecated upstream but is what compatible local servers honour
    #[allow(deprecated)]
    fn build_vision_request(
        &self,
        image: &ImagePayload,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<CreateChatCompletionRequest> {
        let invalid = |error: OpenAIError| {
            FoodScanError::Internal(format!("Invalid vision request: {error}"))
        };

        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()
            .map_err(invalid)?;

        let text_part = ChatCompletionRequestMessageContentPartTextArgs::default()
            .text(user_prompt)
            .build()
            .map_err(invalid)?;

        let image_part = ChatCompletionRequestMessageContentPartImageArgs::default()
            .image_url(
                ImageUrlArgs::default()
                    .url(image.to_data_url())
                    .detail(ImageDetail::Auto)
                    .build()
                    .map_err(invalid)?,
            )
            .build()
            .map_err(invalid)?;

        let parts: Vec<ChatCompletionRequestUserMessageContentPart> =
            vec![text_part.into(), image_part.into()];
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(parts)
            .build()
            .map_err(invalid)?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![system.into(), user.into()];

        CreateChatCompletionRequestArgs::default()
            .model(self.config.model.clone())
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(invalid)
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| FoodScanError::Llm("LLM response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        if message.trim().is_empty() {
            return Err(FoodScanError::Llm(
                "LLM response contained empty content".to_string(),
            ));
        }

        Ok(message)
    }

    fn is_retryable(error: &OpenAIError) -> bool {
        match error {
            OpenAIError::ApiError(api_error) => {
                api_error.r#type.is_none() && api_error.code.is_none()
            }
            OpenAIError::Reqwest(reqwest_error) => reqwest_error
                .status()
                .map(|status| status.is_server_error())
                .unwrap_or(true),
            _ => false,
        }
    }

    fn rate_limit_error(error: &OpenAIError) -> Option<FoodScanError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) =>
            {
                Some(FoodScanError::LlmRateLimit { retry_after: None })
            }
            OpenAIError::ApiError(api_error) if Self::is_rate_limit_api_error(api_error) => {
                Some(FoodScanError::LlmRateLimit { retry_after: None })
            }
            _ => None,
        }
    }

    fn auth_error(error: &OpenAIError) -> Option<FoodScanError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::UNAUTHORIZED)
                    || reqwest_error.status() == Some(reqwest::StatusCode::FORBIDDEN) =>
            {
                Some(FoodScanError::Llm(format!(
                    "LLM authentication failed: {reqwest_error}"
                )))
            }
            OpenAIError::ApiError(api_error) if Self::is_auth_api_error(api_error) => Some(
                FoodScanError::Llm(format!("LLM authentication failed: {api_error}")),
            ),
            _ => None,
        }
    }

    fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("rate limit")
            || message.contains("too many requests")
            || error_type.contains("rate_limit")
            || code.contains("rate_limit")
            || code == "insufficient_quota"
    }

    fn is_auth_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("unauthorized")
            || message.contains("invalid api key")
            || message.contains("incorrect api key")
            || code.contains("invalid_api_key")
            || error_type.contains("authentication")
    }

    fn map_openai_error(error: OpenAIError) -> FoodScanError {
        match error {
            OpenAIError::Reqwest(reqwest_error) if reqwest_error.is_timeout() => {
                FoodScanError::Llm(format!("LLM request timed out: {reqwest_error}"))
            }
            OpenAIError::Reqwest(reqwest_error) => {
                FoodScanError::Llm(format!("LLM request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                FoodScanError::Llm(format!("LLM API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                FoodScanError::Llm(format!("Failed to parse LLM response: {err}"))
            }
            other => FoodScanError::Llm(other.to_string()),
        }
    }
}

impl ApiConfig {
    fn from_llm_config(config: &LlmConfig) -> Self {
        let (provider, model) = parse_llm_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        let normalized_model = if provider.eq_ignore_ascii_case("local") {
            config.model.clone()
        } else {
            model.to_string()
        };

        Self {
            base_url,
            api_key: config.api_key.clone(),
            model: normalized_model,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
            max_tokens: config.max_tokens,
        }
    }
}

fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::types::ChatCompletionRequestUserMessageContent;

    fn test_llm_config(model: &str) -> LlmConfig {
        LlmConfig {
            model: model.to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 30,
            max_retries: 0,
            max_tokens: 500,
        }
    }

    fn jpeg() -> ImagePayload {
        ImagePayload {
            bytes: b"abc".to_vec(),
            mime_type: "image/jpeg".to_string(),
        }
    }

    #[test]
    fn test_hosted_provider_requires_api_key() {
        let err = LlmApiClient::new(&test_llm_config("openai/gpt-4o-mini"))
            .err()
            .expect("missing key should be rejected");
        assert!(matches!(err, FoodScanError::LlmUnavailable(_)));
    }

    #[test]
    fn test_local_provider_needs_no_key() {
        let client = LlmApiClient::new(&test_llm_config("ollama/llava")).unwrap();
        assert_eq!(client.model(), "llava");
        assert_eq!(client.base_url(), OLLAMA_BASE_URL);
    }

    #[test]
    fn test_vision_request_shape() {
        let client = LlmApiClient::new(&test_llm_config("ollama/llava")).unwrap();
        let request = client
            .build_vision_request(&jpeg(), "system text", "user text")
            .expect("request should build");

        assert_eq!(request.model, "llava");
        #[allow(deprecated)]
        let max_tokens = request.max_tokens;
        assert_eq!(max_tokens, Some(500));
        assert_eq!(request.messages.len(), 2);
        assert!(matches!(
            request.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));

        let ChatCompletionRequestMessage::User(user) = &request.messages[1] else {
            panic!("second message should be the user message");
        };
        let ChatCompletionRequestUserMessageContent::Array(parts) = &user.content else {
            panic!("user content should be multi-part");
        };
        assert_eq!(parts.len(), 2);
        match &parts[1] {
            ChatCompletionRequestUserMessageContentPart::ImageUrl(image) => {
                assert_eq!(image.image_url.url, "data:image/jpeg;base64,YWJj");
            }
            other => panic!("expected image part, got {other:?}"),
        }
    }

    #[test]
    fn test_base_url_override() {
        let mut config = test_llm_config("custom-vision");
        config.base_url = Some("http://vision.internal/v1".to_string());
        let client = LlmApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://vision.internal/v1");
        assert_eq!(client.model(), "custom-vision");
    }
}
