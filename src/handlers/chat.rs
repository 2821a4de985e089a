use axum::{extract::State, Json};
use validator::Validate;

use crate::error::AppResult;
use crate::models::chat::{ChatRequest, ChatResponse, SentimentRequest, SentimentResponse};
use crate::AppState;

pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    body.validate()?;
    let reply = state.chat.reply(&state.store, body).await;
    Ok(Json(reply))
}

pub async fn classify_sentiment(
    State(state): State<AppState>,
    Json(body): Json<SentimentRequest>,
) -> Json<SentimentResponse> {
    let score = state.chat.classifier().score(&body.text);
    Json(SentimentResponse {
        mood: score.label(),
        positive: score.positive,
        negative: score.negative,
    })
}
