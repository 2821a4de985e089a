use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::MoodStore;
use crate::models::chat::{ChatRequest, ChatResponse, ConversationMode, ReplySource};
use crate::models::mood::{MoodEntry, MoodLabel};
use crate::services::cbt;
use crate::services::gateway::{ChatPrompt, GenerationConfig, ResponseGateway};
use crate::services::sentiment::SentimentClassifier;
use crate::services::suggestions;

/// Shown to the user whenever the gateway fails for any reason.
pub const FALLBACK_RESPONSE: &str =
    "I'm here to help! Would you like to tell me how you're feeling?";

const SUMMARY_ENTRIES: usize = 3;

#[derive(Clone)]
pub struct ChatService {
    gateway: Arc<dyn ResponseGateway>,
    classifier: SentimentClassifier,
}

impl ChatService {
    pub fn new(gateway: Arc<dyn ResponseGateway>, classifier: SentimentClassifier) -> Self {
        Self {
            gateway,
            classifier,
        }
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    /// One chat turn.
    ///
    /// The store lock is released while the gateway is running. The mood of
    /// the latest entry is only overwritten after a successful reply from a
    /// gateway that reports `updates_mood`.
    pub async fn reply(&self, store: &Mutex<MoodStore>, request: ChatRequest) -> ChatResponse {
        let mut warnings = Vec::new();

        let entries = {
            let store = store.lock().await;
            store.load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to load mood data for chat");
                warnings.push(e.to_string());
                Vec::new()
            })
        };

        let prompt = build_prompt(&request, &entries);

        let response = match self.gateway.respond(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Response gateway failed, using fallback reply");
                return ChatResponse {
                    response: FALLBACK_RESPONSE.to_string(),
                    source: ReplySource::Fallback,
                    detected_mood: None,
                    session: request.session,
                    warnings,
                };
            }
        };

        let detected = if self.gateway.updates_mood() {
            let detected = self.classifier.classify(&request.message);
            let store = store.lock().await;
            match store.update_last_mood(detected) {
                Ok(true) => tracing::debug!(mood = %detected, "Latest entry mood updated from chat"),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to persist detected mood");
                    warnings.push(e.to_string());
                }
            }
            Some(detected)
        } else {
            None
        };

        let session = match request.mode {
            ConversationMode::Guided => cbt::advance(&request.session, &request.message),
            ConversationMode::Supportive => request.session,
        };

        ChatResponse {
            response,
            source: self.gateway.source(),
            detected_mood: detected,
            session,
            warnings,
        }
    }
}

pub fn build_prompt(request: &ChatRequest, entries: &[MoodEntry]) -> ChatPrompt {
    let current_mood = entries.last().map(|e| e.mood).unwrap_or_default();

    let mut system_instruction = system_instruction(current_mood);
    if request.mode == ConversationMode::Guided {
        let step_script = cbt::script(request.session.step, request.session.user_name.as_deref());
        system_instruction.push_str(&format!(
            "\n11. You are guiding a structured CBT check-in. Respond to the user, then ask: {}",
            step_script
        ));
    }

    ChatPrompt {
        system_instruction,
        user_text: request.message.clone(),
        mood_summary: mood_summary(entries),
        generation: GenerationConfig::for_mode(request.mode),
    }
}

fn system_instruction(current_mood: MoodLabel) -> String {
    format!(
        "You are a supportive CBT chatbot designed for emotion and mood tracking. Follow these guidelines:\n\
         1. Keep responses short and concise (2-3 sentences max)\n\
         2. Be empathetic and supportive, offer comfort when appropriate\n\
         3. Use a friendly, conversational tone\n\
         4. Focus on the user's current feelings and experiences\n\
         5. Balance between asking questions and providing comfort\n\
         6. Use the mood data to personalize your responses\n\
         7. When offering comfort, validate their feelings, share a brief encouraging message and offer a gentle suggestion if appropriate\n\
         8. End with either a follow-up question or a supportive statement\n\
         9. Include one of these mood-improving suggestions when relevant: {}\n\
         10. Adapt your tone based on the user's current mood: {}",
        suggestions::for_mood(current_mood).join(", "),
        current_mood.display(),
    )
}

/// Summary of the last three entries, or `None` for an empty log.
pub fn mood_summary(entries: &[MoodEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    let start = entries.len().saturating_sub(SUMMARY_ENTRIES);
    let mut summary = String::from("Here's the user's recent mood data:\n");
    for entry in &entries[start..] {
        summary.push_str(&format!(
            "Date: {}, Mood: {}, Stress: {}, Water: {}, Energy: {}\n",
            entry.date, entry.mood, entry.stress, entry.water, entry.energy
        ));
    }
    Some(summary)
}
