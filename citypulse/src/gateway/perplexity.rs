//! Perplexity chat-completions client.
//!
//! Every mode builds one [`ChatRequest`], posts it with bearer auth and maps the reply. Non-2xx
//! statuses keep the response body in [`GatewayError::Status`]; a 2xx body without choices is
//! [`GatewayError::MalformedResponse`].

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::prompts::{insights_user_prompt, SystemPrompts};
use super::wire::{
    ChatMessage, ChatRequest, ChatResponse, CitationRef, ContentPart, ImageUrl, MessageContent,
    ResponseFormat, Role, SearchContextSize, UserLocation, WebSearchOptions,
};
use super::{content_text, PlaceSummary, SearchGateway, StructuredResponse};
use crate::error::{ConfigError, GatewayError};

pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai/chat/completions";
pub const API_KEY_ENV: &str = "PERPLEXITY_API_KEY";
pub const BASE_URL_ENV: &str = "PERPLEXITY_BASE_URL";

/// Model identifiers used by the query modes.
pub mod models {
    pub const SONAR: &str = "sonar";
    pub const SONAR_PRO: &str = "sonar-pro";
    pub const SONAR_REASONING: &str = "sonar-reasoning";
    pub const SONAR_REASONING_PRO: &str = "sonar-reasoning-pro";
}

/// Text answer with whatever sources and images the service attached.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchAnswer {
    pub text: String,
    pub citations: Vec<CitationRef>,
    pub images: Vec<Value>,
}

/// Client for the Perplexity chat-completions endpoint.
#[derive(Clone)]
pub struct PerplexityClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    prompts: SystemPrompts,
}

impl std::fmt::Debug for PerplexityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerplexityClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PerplexityClient {
    /// Fails with [`ConfigError::MissingApiKey`] when `api_key` is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey { var: API_KEY_ENV });
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("citypulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            prompts: SystemPrompts::embedded()?,
        })
    }

    /// Reads `PERPLEXITY_API_KEY` and, when set, `PERPLEXITY_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key = std::env::var(API_KEY_ENV).unwrap_or_default();
        let client = Self::new(key)?;
        Ok(match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => client.with_base_url(url),
            _ => client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a caller-built HTTP client (proxies, timeouts, connection pools).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, GatewayError> {
        debug!(model = %request.model, url = %self.base_url, "search request");
        let res = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }
        let text = res.text().await?;
        let response: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        if response.choices.is_empty() {
            return Err(GatewayError::MalformedResponse(
                "response has no choices".to_string(),
            ));
        }
        Ok(response)
    }

    async fn answer(&self, request: ChatRequest) -> Result<SearchAnswer, GatewayError> {
        let mut response = self.complete(&request).await?;
        let text = response.first_content().map(content_text).unwrap_or_default();
        let images = std::mem::take(&mut response.images);
        Ok(SearchAnswer {
            text,
            citations: response.into_citations(),
            images,
        })
    }

    async fn structured(&self, request: ChatRequest) -> Result<StructuredResponse, GatewayError> {
        let response = self.complete(&request).await?;
        let content = response.first_content().cloned().unwrap_or(Value::Null);
        Ok(StructuredResponse {
            content,
            citations: response.into_citations(),
        })
    }

    fn with_system(&self, model: &str, system: &str, prompt: &str) -> ChatRequest {
        ChatRequest::new(
            model,
            vec![ChatMessage::system(system), ChatMessage::user(prompt)],
        )
    }

    /// Search restricted to (or, with a leading `-`, excluding) the given domains.
    pub async fn filtered_search(
        &self,
        prompt: &str,
        domains: &[String],
    ) -> Result<SearchAnswer, GatewayError> {
        let mut req = self.with_system(
            models::SONAR_REASONING_PRO,
            &self.prompts.plain_assistant,
            prompt,
        );
        if !domains.is_empty() {
            req.search_domain_filter = Some(domains.to_vec());
        }
        self.answer(req).await
    }

    /// Search limited to sources published in a date window (`MM/DD/YYYY` bounds).
    pub async fn date_filtered_search(
        &self,
        prompt: &str,
        after: Option<&str>,
        before: Option<&str>,
    ) -> Result<SearchAnswer, GatewayError> {
        let mut req = self.with_system(models::SONAR_PRO, &self.prompts.current_events, prompt);
        req.search_after_date_filter = after.map(str::to_string);
        req.search_before_date_filter = before.map(str::to_string);
        self.answer(req).await
    }

    /// Search returning images, optionally limited to image domains.
    pub async fn image_search(
        &self,
        prompt: &str,
        image_domains: &[String],
    ) -> Result<SearchAnswer, GatewayError> {
        let mut req = ChatRequest::new(models::SONAR, vec![ChatMessage::user(prompt)]);
        req.return_images = Some(true);
        if !image_domains.is_empty() {
            req.image_domain_filter = Some(image_domains.to_vec());
        }
        self.answer(req).await
    }

    /// Question about the image at `image_url`.
    pub async fn analyze_image(
        &self,
        prompt: &str,
        image_url: &str,
    ) -> Result<SearchAnswer, GatewayError> {
        let message = ChatMessage {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: prompt.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.to_string(),
                    },
                },
            ]),
        };
        self.answer(ChatRequest::new(models::SONAR_PRO, vec![message]))
            .await
    }

    /// Output constrained to `schema` under a terse instruction.
    pub async fn structured_output(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<StructuredResponse, GatewayError> {
        let mut req = self.with_system(models::SONAR, &self.prompts.precise, prompt);
        req.response_format = Some(ResponseFormat::json_schema(schema));
        self.structured(req).await
    }

    /// Discovery instruction, output constrained to `schema`, no citation request.
    pub async fn geo_structured_output(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<StructuredResponse, GatewayError> {
        let mut req = self.with_system(models::SONAR, &self.prompts.discovery, prompt);
        req.response_format = Some(ResponseFormat::json_schema(schema));
        self.structured(req).await
    }

    /// Search with an explicit amount of retrieved web context.
    pub async fn search_with_context_size(
        &self,
        prompt: &str,
        size: SearchContextSize,
    ) -> Result<SearchAnswer, GatewayError> {
        let mut req = self.with_system(models::SONAR_REASONING_PRO, &self.prompts.precise, prompt);
        req.web_search_options = Some(WebSearchOptions {
            search_context_size: Some(size),
            ..WebSearchOptions::default()
        });
        self.answer(req).await
    }
}

#[async_trait]
impl SearchGateway for PerplexityClient {
    async fn basic_query(&self, prompt: &str) -> Result<String, GatewayError> {
        let req = ChatRequest::new(models::SONAR_PRO, vec![ChatMessage::user(prompt)]);
        Ok(self.answer(req).await?.text)
    }

    async fn geo_structured_output_with_citations(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<StructuredResponse, GatewayError> {
        let mut req = self.with_system(
            models::SONAR,
            &self.prompts.discovery_with_citations,
            prompt,
        );
        req.response_format = Some(ResponseFormat::json_schema(schema));
        req.return_citations = Some(true);
        req.return_images = Some(false);
        self.structured(req).await
    }

    async fn location_based_search(
        &self,
        prompt: &str,
        location: &UserLocation,
    ) -> Result<String, GatewayError> {
        let mut req = self.with_system(models::SONAR_PRO, &self.prompts.local_guide, prompt);
        req.web_search_options = Some(WebSearchOptions {
            user_location: Some(location.clone()),
            ..WebSearchOptions::default()
        });
        Ok(self.answer(req).await?.text)
    }

    async fn location_insights(&self, place: &PlaceSummary) -> Result<String, GatewayError> {
        let user = insights_user_prompt(
            &place.name,
            &place.kind,
            &place.description,
            place.address.as_deref().unwrap_or(""),
        );
        let mut req = self.with_system(models::SONAR_REASONING, &self.prompts.insights, &user);
        req.return_citations = Some(true);
        Ok(self.answer(req).await?.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_rejected() {
        let err = PerplexityClient::new("  ").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingApiKey {
                var: "PERPLEXITY_API_KEY"
            }
        ));
    }

    #[test]
    fn base_url_defaults_and_overrides() {
        let c = PerplexityClient::new("k").unwrap();
        assert_eq!(c.base_url(), DEFAULT_BASE_URL);
        let c = c.with_base_url("http://127.0.0.1:9/chat");
        assert_eq!(c.base_url(), "http://127.0.0.1:9/chat");
    }

    #[test]
    fn debug_hides_api_key() {
        let c = PerplexityClient::new("secret-key").unwrap();
        assert!(!format!("{:?}", c).contains("secret-key"));
    }

    #[test]
    fn discovery_request_carries_schema_and_citation_flags() {
        let c = PerplexityClient::new("k").unwrap();
        let mut req = c.with_system(models::SONAR, &c.prompts.discovery_with_citations, "near me");
        req.response_format = Some(ResponseFormat::json_schema(&serde_json::json!({"type": "object"})));
        req.return_citations = Some(true);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "sonar");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "near me");
        assert_eq!(v["response_format"]["type"], "json_schema");
        assert_eq!(v["response_format"]["json_schema"]["schema"]["type"], "object");
        assert_eq!(v["return_citations"], true);
    }
}
