//! Scripted CBT conversation flow used by the guided chat mode.
//!
//! The session lives on the client; every turn sends the current
//! [`CbtSession`] and receives the next one.

use crate::models::chat::{CbtSession, CbtStep};

const MAX_NAME_LEN: usize = 40;

impl CbtStep {
    pub fn next(self) -> Self {
        match self {
            CbtStep::Greeting => CbtStep::NameValidation,
            CbtStep::NameValidation => CbtStep::Sleep,
            CbtStep::Sleep => CbtStep::EmotionalExploration,
            CbtStep::EmotionalExploration => CbtStep::Reframing,
            CbtStep::Reframing | CbtStep::Activities => CbtStep::Activities,
        }
    }
}

/// The question the bot should steer towards at `step`.
pub fn script(step: CbtStep, user_name: Option<&str>) -> String {
    let name = user_name.unwrap_or("friend");
    match step {
        CbtStep::Greeting => "Hey there! How can I call you?".to_string(),
        CbtStep::NameValidation => format!("Hey {}, how are you doing today?", name),
        CbtStep::Sleep => format!("How long was your sleep last night, {}?", name),
        CbtStep::EmotionalExploration => format!("What made you upset today, {}?", name),
        CbtStep::Reframing => {
            "Let's take a step back. What is one small positive thing that happened today?"
                .to_string()
        }
        CbtStep::Activities => "Now, let's do something to make you feel better! Here are some options:\n\
             1. 🧘 Guided Breathing Exercise\n\
             2. 🎵 Listen to Relaxing Music\n\
             3. 📓 Write a Gratitude Note\n\
             4. 🏃 Go for a Short Walk & Check Back"
            .to_string(),
    }
}

/// Session after the user answered `session.step` with `user_text`.
pub fn advance(session: &CbtSession, user_text: &str) -> CbtSession {
    let user_name = match session.step {
        CbtStep::Greeting => extract_name(user_text).or_else(|| session.user_name.clone()),
        _ => session.user_name.clone(),
    };
    CbtSession {
        step: session.step.next(),
        user_name,
    }
}

/// Best-effort name from replies like "I'm Sam" or "call me Alex!".
pub fn extract_name(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let mut rest = trimmed;
    for prefix in ["my name is ", "you can call me ", "call me ", "i am ", "i'm ", "im "] {
        let matches = trimmed
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches {
            rest = &trimmed[prefix.len()..];
            break;
        }
    }

    let name: String = rest
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '\'')
        .take(MAX_NAME_LEN)
        .collect();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
