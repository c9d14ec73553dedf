//! Request and response bodies of the search service's chat-completions endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One part of a multi-part user message (text plus image for image analysis).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }
}

/// `response_format` constraining output to a JSON Schema.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub json_schema: JsonSchemaSpec,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JsonSchemaSpec {
    pub schema: Value,
}

impl ResponseFormat {
    pub fn json_schema(schema: &Value) -> Self {
        Self {
            kind: "json_schema",
            json_schema: JsonSchemaSpec {
                schema: schema.clone(),
            },
        }
    }
}

/// Geographic context biasing the search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// ISO 3166-1 alpha-2 country code, e.g. `US`.
    pub country: String,
}

/// How much retrieved web context the service feeds the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchContextSize {
    #[default]
    Low,
    Medium,
    High,
}

impl std::str::FromStr for SearchContextSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!(
                "unknown search context size: {} (use low, medium, or high)",
                s
            )),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WebSearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<UserLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_context_size: Option<SearchContextSize>,
}

/// Body of one chat-completions call. Optional knobs are omitted from the JSON when unset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_citations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_images: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_domain_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_after_date_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_before_date_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_domain_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_search_options: Option<WebSearchOptions>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            response_format: None,
            return_citations: None,
            return_images: None,
            search_domain_filter: None,
            search_after_date_filter: None,
            search_before_date_filter: None,
            image_domain_filter: None,
            web_search_options: None,
        }
    }
}

/// Top-level source reference. The service sends either bare URL strings or objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCitation")]
pub struct CitationRef {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCitation {
    Url(String),
    Object {
        #[serde(default)]
        url: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        date: Option<String>,
    },
}

impl From<RawCitation> for CitationRef {
    fn from(raw: RawCitation) -> Self {
        match raw {
            RawCitation::Url(url) => CitationRef {
                url,
                title: None,
                date: None,
            },
            RawCitation::Object { url, title, date } => CitationRef { url, title, date },
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub citations: Option<Vec<CitationRef>>,
    #[serde(default)]
    pub search_results: Option<Vec<CitationRef>>,
    /// Present when `return_images` was requested.
    #[serde(default)]
    pub images: Vec<Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AssistantMessage {
    /// Text for plain modes; for schema-constrained modes either the structure or its JSON text.
    #[serde(default)]
    pub content: Value,
}

impl ChatResponse {
    /// `content` of the first choice.
    pub fn first_content(&self) -> Option<&Value> {
        self.choices.first().map(|c| &c.message.content)
    }

    /// Source list in service order: `citations` when present, else `search_results`.
    pub fn into_citations(self) -> Vec<CitationRef> {
        self.citations
            .or(self.search_results)
            .unwrap_or_default()
            .into_iter()
            .filter(|c| !c.url.is_empty())
            .collect()
    }
}
