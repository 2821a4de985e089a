use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::GatewayError;
use crate::models::chat::{ConversationMode, ReplySource};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

impl GenerationConfig {
    pub fn for_mode(mode: ConversationMode) -> Self {
        match mode {
            ConversationMode::Supportive => Self {
                temperature: 0.7,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 150,
                stop_sequences: vec![],
            },
            ConversationMode::Guided => Self {
                temperature: 0.4,
                top_p: 0.9,
                top_k: 32,
                max_output_tokens: 120,
                stop_sequences: vec!["\n\n".into()],
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatPrompt {
    pub system_instruction: String,
    pub user_text: String,
    pub mood_summary: Option<String>,
    pub generation: GenerationConfig,
}

/// Anything that can turn a prompt into chatbot text.
#[async_trait]
pub trait ResponseGateway: Send + Sync {
    fn source(&self) -> ReplySource;

    /// Whether a successful reply should rewrite the latest entry's mood.
    /// Offline replies are not a real reading of the user's message.
    fn updates_mood(&self) -> bool {
        true
    }

    async fn respond(&self, prompt: &ChatPrompt) -> Result<String, GatewayError>;
}

/// Pick the gateway once at startup: a credential means the real service.
pub fn from_config(config: &Config) -> anyhow::Result<Arc<dyn ResponseGateway>> {
    match &config.google_api_key {
        Some(key) => {
            tracing::info!(model = %config.gemini_model, "Using Gemini response gateway");
            let gateway = GeminiGateway::new(
                key.clone(),
                config.gemini_model.clone(),
                Duration::from_secs(config.gateway_timeout_secs),
            )?
            .with_base_url(config.gemini_base_url.clone());
            Ok(Arc::new(gateway))
        }
        None => {
            tracing::warn!("GOOGLE_API_KEY not set, using canned response gateway");
            Ok(Arc::new(CannedGateway))
        }
    }
}

// ── Gemini ───────────────────────────────────────────────────────────────────

pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGateway {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, GatewayError> {
        if api_key.trim().is_empty() {
            return Err(GatewayError::MissingCredential);
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ResponseGateway for GeminiGateway {
    fn source(&self) -> ReplySource {
        ReplySource::Gemini
    }

    async fn respond(&self, prompt: &ChatPrompt) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let chunks: Value = response.json().await?;
        let text = collect_stream_text(&chunks);
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }
}

pub fn build_request_body(prompt: &ChatPrompt) -> Value {
    let mut contents = vec![json!({
        "role": "user",
        "parts": [{ "text": prompt.user_text }],
    })];
    if let Some(summary) = &prompt.mood_summary {
        contents.push(json!({
            "role": "user",
            "parts": [{ "text": summary }],
        }));
    }

    let mut generation = serde_json::to_value(&prompt.generation).unwrap_or_else(|_| json!({}));
    generation["responseMimeType"] = json!("text/plain");

    json!({
        "systemInstruction": { "parts": [{ "text": prompt.system_instruction }] },
        "contents": contents,
        "generationConfig": generation,
    })
}

/// Concatenate the text of every streamed fragment, in order.
///
/// The streaming endpoint answers with an array of partial responses; a
/// single object is accepted as a one-fragment stream.
pub fn collect_stream_text(chunks: &Value) -> String {
    let fragments: Vec<&Value> = match chunks {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut text = String::new();
    for fragment in fragments {
        let parts = fragment["candidates"][0]["content"]["parts"].as_array();
        for part in parts.into_iter().flatten() {
            if let Some(t) = part["text"].as_str() {
                text.push_str(t);
            }
        }
    }
    text
}

// ── Canned ───────────────────────────────────────────────────────────────────

/// Deterministic offline replies used when no credential is configured.
pub struct CannedGateway;

#[async_trait]
impl ResponseGateway for CannedGateway {
    fn source(&self) -> ReplySource {
        ReplySource::Canned
    }

    fn updates_mood(&self) -> bool {
        false
    }

    async fn respond(&self, prompt: &ChatPrompt) -> Result<String, GatewayError> {
        let input = prompt.user_text.to_lowercase();
        let reply = if input.contains("greeting") {
            "Hey there! How can I call you?"
        } else if input.contains("name") {
            "Nice to meet you! How are you feeling today?"
        } else {
            "I understand. Would you like to tell me more about how you're feeling?"
        };
        Ok(reply.to_string())
    }
}
