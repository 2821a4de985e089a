use crate::models::mood::MoodLabel;

const BAD: &[&str] = &[
    "Take a few deep breaths and try a quick mindfulness exercise",
    "Go for a short walk or do some gentle stretching",
    "Listen to your favorite uplifting music",
    "Write down three things you're grateful for",
    "Try a quick meditation or relaxation technique",
];

const MEH: &[&str] = &[
    "Try a new hobby or activity you've been interested in",
    "Connect with a friend or family member",
    "Do something creative like drawing or writing",
    "Take a break and do something you enjoy",
    "Plan something to look forward to",
];

const GOOD: &[&str] = &[
    "Share your positive energy with others",
    "Document what's making you feel good",
    "Build on this momentum with a small achievement",
    "Practice gratitude for this moment",
    "Plan to maintain this positive state",
];

/// Mood-improving suggestions offered for the given mood.
pub fn for_mood(mood: MoodLabel) -> &'static [&'static str] {
    match mood {
        MoodLabel::Bad => BAD,
        MoodLabel::Meh => MEH,
        MoodLabel::Good | MoodLabel::Great => GOOD,
    }
}
