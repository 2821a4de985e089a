use axum::{extract::State, Json};
use validator::Validate;

use crate::db::MoodStore;
use crate::error::AppResult;
use crate::models::mood::{CreateEntryRequest, JournalView, MoodEntry, UpdateMoodRequest};
use crate::AppState;

/// Store failures never fail the request; they become warnings and the
/// caller carries on with an empty log.
fn load_or_warn(store: &MoodStore, warnings: &mut Vec<String>) -> Vec<MoodEntry> {
    store.load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Error loading mood data");
        warnings.push(e.to_string());
        Vec::new()
    })
}

pub async fn list_entries(State(state): State<AppState>) -> Json<JournalView> {
    let mut warnings = Vec::new();
    let entries = {
        let store = state.store.lock().await;
        load_or_warn(&store, &mut warnings)
    };
    Json(JournalView::new(entries, warnings))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(body): Json<CreateEntryRequest>,
) -> AppResult<Json<JournalView>> {
    body.validate()?;

    let entry = MoodEntry::new(body.mood, body.stress, body.water, body.energy);
    let mut warnings = Vec::new();

    let store = state.store.lock().await;
    let mut entries = load_or_warn(&store, &mut warnings);
    entries.push(entry);
    if let Err(e) = store.save(&entries) {
        tracing::warn!(error = %e, "Error saving mood data");
        warnings.push(e.to_string());
    } else {
        tracing::info!(mood = %body.mood, total = entries.len(), "Mood logged");
    }
    drop(store);

    Ok(Json(JournalView::new(entries, warnings)))
}

pub async fn clear_entries(State(state): State<AppState>) -> Json<JournalView> {
    let mut warnings = Vec::new();
    {
        let store = state.store.lock().await;
        match store.clear() {
            Ok(()) => tracing::info!("Mood history cleared"),
            Err(e) => {
                tracing::warn!(error = %e, "Error clearing mood history");
                warnings.push(e.to_string());
            }
        }
    }
    Json(JournalView::new(Vec::new(), warnings))
}

/// Mood radio changed: rewrite the latest entry's mood.
pub async fn update_last_mood(
    State(state): State<AppState>,
    Json(body): Json<UpdateMoodRequest>,
) -> Json<JournalView> {
    let mut warnings = Vec::new();
    let store = state.store.lock().await;
    match store.update_last_mood(body.mood) {
        Ok(true) => tracing::debug!(mood = %body.mood, "Latest entry mood updated"),
        Ok(false) => tracing::debug!("No entries yet, mood update ignored"),
        Err(e) => {
            tracing::warn!(error = %e, "Error updating mood");
            warnings.push(e.to_string());
        }
    }
    let entries = load_or_warn(&store, &mut warnings);
    drop(store);

    Json(JournalView::new(entries, warnings))
}
