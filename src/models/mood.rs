use chrono::Local;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Timestamp layout used for `MoodEntry::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MoodLabel {
    #[serde(alias = "😞 Bad")]
    Bad,
    #[serde(alias = "😐 Meh")]
    Meh,
    #[serde(alias = "😊 Good")]
    Good,
    // Manual-only: the classifier never produces it.
    #[serde(alias = "🤩 Great")]
    Great,
}

impl Default for MoodLabel {
    fn default() -> Self {
        Self::Meh
    }
}

impl MoodLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Bad => "Bad",
            MoodLabel::Meh => "Meh",
            MoodLabel::Good => "Good",
            MoodLabel::Great => "Great",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoodLabel::Bad => "😞",
            MoodLabel::Meh => "😐",
            MoodLabel::Good => "😊",
            MoodLabel::Great => "🤩",
        }
    }

    /// Display form used by the journal UI, e.g. `"😊 Good"`.
    pub fn display(&self) -> String {
        format!("{} {}", self.emoji(), self.as_str())
    }
}

impl std::fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoodEntry {
    pub date: String,
    pub mood: MoodLabel,
    pub stress: i32,
    pub water: i32,
    pub energy: i32,
}

impl MoodEntry {
    /// New entry stamped with the current local time.
    pub fn new(mood: MoodLabel, stress: i32, water: i32, energy: i32) -> Self {
        Self {
            date: Local::now().format(DATE_FORMAT).to_string(),
            mood,
            stress,
            water,
            energy,
        }
    }
}

/// POST /api/entries
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntryRequest {
    #[serde(default)]
    pub mood: MoodLabel,

    #[serde(default = "default_level")]
    #[validate(range(min = 0, max = 10, message = "Stress must be 0-10"))]
    pub stress: i32,

    #[serde(default = "default_level")]
    #[validate(range(min = 0, max = 10, message = "Water must be 0-10"))]
    pub water: i32,

    #[serde(default = "default_level")]
    #[validate(range(min = 0, max = 10, message = "Energy must be 0-10"))]
    pub energy: i32,
}

fn default_level() -> i32 {
    5
}

/// PUT /api/entries/last/mood
#[derive(Debug, Deserialize)]
pub struct UpdateMoodRequest {
    pub mood: MoodLabel,
}

#[derive(Debug, Serialize)]
pub struct JournalView {
    pub entries: Vec<MoodEntry>,
    /// Last five entries, newest first.
    pub recent: Vec<MoodEntry>,
    pub current_mood: MoodLabel,
    pub suggestions: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl JournalView {
    pub fn new(entries: Vec<MoodEntry>, warnings: Vec<String>) -> Self {
        let current_mood = entries.last().map(|e| e.mood).unwrap_or_default();
        let recent = entries.iter().rev().take(5).cloned().collect();
        Self {
            entries,
            recent,
            current_mood,
            suggestions: crate::services::suggestions::for_mood(current_mood).to_vec(),
            warnings,
        }
    }
}
