use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod rate_limit;
mod services;

use config::Config;
use db::MoodStore;
use rate_limit::RateLimitState;
use services::chat::ChatService;
use services::sentiment::SentimentClassifier;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Mutex<MoodStore>>,
    pub chat: ChatService,
    pub rate_limiter: RateLimitState,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodjournal_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let store = MoodStore::new(&config.mood_data_path);
    tracing::info!(path = %store.path().display(), "Mood store ready");

    let gateway = services::gateway::from_config(&config)?;
    let chat = ChatService::new(gateway, SentimentClassifier::new(config.sentiment_lexicon));

    let rate_limiter = RateLimitState::new(config.chat_rate_limit_per_min);
    rate_limiter.spawn_cleanup_worker();

    let state = AppState {
        config: config.clone(),
        store: Arc::new(Mutex::new(store)),
        chat,
        rate_limiter,
    };

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    // Client IP is needed for rate limiting
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let chat_routes = Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_chat,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        // Journal
        .route(
            "/api/entries",
            get(handlers::entries::list_entries)
                .post(handlers::entries::create_entry)
                .delete(handlers::entries::clear_entries),
        )
        .route(
            "/api/entries/last/mood",
            put(handlers::entries::update_last_mood),
        )
        .route(
            "/api/sentiment",
            post(handlers::chat::classify_sentiment),
        )
        .merge(chat_routes);

    Router::new()
        .merge(api_routes)
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let mut origins = vec![config.frontend_url.clone()];
    // In dev, also allow LAN access (e.g. testing from another device)
    if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
        origins.extend(extra.split(',').map(|o| o.trim().to_string()));
    }
    let allowed_origins: Vec<axum::http::HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<axum::http::HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
}
