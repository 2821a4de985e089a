use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::mood::MoodLabel;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConversationMode {
    Supportive,
    Guided,
}

impl Default for ConversationMode {
    fn default() -> Self {
        Self::Supportive
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CbtStep {
    Greeting,
    NameValidation,
    Sleep,
    EmotionalExploration,
    Reframing,
    Activities,
}

impl Default for CbtStep {
    fn default() -> Self {
        Self::Greeting
    }
}

/// Conversation state owned by the client and echoed back on every turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CbtSession {
    #[serde(default)]
    pub step: CbtStep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// POST /api/chat
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub message: String,
    #[serde(default)]
    pub mode: ConversationMode,
    #[serde(default)]
    pub session: CbtSession,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Gemini,
    Canned,
    Fallback,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub source: ReplySource,
    /// Mood detected from the user's message; `None` when the reply came
    /// from the fallback or the offline gateway.
    pub detected_mood: Option<MoodLabel>,
    pub session: CbtSession,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// POST /api/sentiment
#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub mood: MoodLabel,
    pub positive: usize,
    pub negative: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_minimal() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(req.mode, ConversationMode::Supportive);
        assert_eq!(req.session.step, CbtStep::Greeting);
        assert!(req.session.user_name.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_chat_request_empty_message_invalid() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_chat_request_guided_session() {
        let json = r#"{"message":"8 hours","mode":"guided","session":{"step":"sleep","user_name":"Sam"}}"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mode, ConversationMode::Guided);
        assert_eq!(req.session.step, CbtStep::Sleep);
        assert_eq!(req.session.user_name.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_chat_response_source_lowercase() {
        let resp = ChatResponse {
            response: "ok".into(),
            source: ReplySource::Fallback,
            detected_mood: None,
            session: CbtSession::default(),
            warnings: vec![],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["session"]["step"], "greeting");
        assert!(json["detected_mood"].is_null());
        assert!(json.get("warnings").is_none());
    }
}
