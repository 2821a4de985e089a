use std::env;

use crate::services::gateway::GEMINI_BASE_URL;
use crate::services::sentiment::Lexicon;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub mood_data_path: String,

    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gateway_timeout_secs: u64,

    pub sentiment_lexicon: Lexicon,
    pub chat_rate_limit_per_min: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),

            mood_data_path: env::var("MOOD_DATA_PATH")
                .unwrap_or_else(|_| "mood_data.json".into()),

            google_api_key: env::var("GOOGLE_API_KEY").ok().filter(|s| !s.trim().is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".into()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| GEMINI_BASE_URL.into()),
            gateway_timeout_secs: env::var("GATEWAY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),

            sentiment_lexicon: env::var("SENTIMENT_LEXICON")
                .unwrap_or_else(|_| "extended".into())
                .parse()
                .expect("SENTIMENT_LEXICON must be `core` or `extended`"),
            chat_rate_limit_per_min: env::var("CHAT_RATE_LIMIT_PER_MIN")
                .unwrap_or_else(|_| "20".into())
                .parse()
                .unwrap_or(20),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
