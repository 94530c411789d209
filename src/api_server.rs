// Axum API Server Module
//
// Purpose: JSON binding for the presentation layer. Each session owns one
// filter state; every request on a session starts a new processing cycle,
// so a reset requested in one request is applied at the start of the next.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::data::CatalogData;
use crate::filter_state::SortKey;
use crate::insight::{restaurant_prompt, InsightClient};
use crate::query_engine::{QueryEngine, TOP_PICKS};
use crate::session::Session;
use crate::source::load_catalog;
use crate::sync::{FilterEvent, SyncController};

/// Idle sessions are dropped after this long
const SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogData>,
    pub insight: InsightClient,
    pub sessions: Cache<String, Arc<Mutex<Session>>>,
}

impl AppState {
    /// Load the catalog (falling back to the sample set) and set up clients
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading restaurant catalog...");
        let catalog = load_catalog(config).await;
        Ok(Self::with_catalog(catalog, config))
    }

    pub fn with_catalog(catalog: CatalogData, config: &AppConfig) -> Self {
        tracing::info!("Initializing session store...");
        let sessions = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(SESSION_IDLE)
            .build();

        Self {
            catalog: Arc::new(catalog),
            insight: InsightClient::new(config),
            sessions,
        }
    }

    async fn session(&self, id: &str) -> Result<Arc<Mutex<Session>>, AppError> {
        self.sessions
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("session not found: {}", id)))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/catalog", get(get_catalog))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/events", post(apply_event))
        .route("/api/sessions/:id/reset", post(request_reset))
        .route("/api/sessions/:id/search", post(request_search))
        .route("/api/sessions/:id/results", get(get_results))
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn get_catalog(State(state): State<AppState>) -> Json<Value> {
    let catalog = &state.catalog;
    let sort_keys: Vec<&str> = SortKey::ALL.iter().map(|k| k.label()).collect();

    Json(json!({
        "origin": catalog.origin,
        "stats": catalog.index.stats(),
        "localities": catalog.index.localities,
        "cuisines": catalog.index.cuisines,
        "price_bounds": catalog.price_bounds,
        "sort_keys": sort_keys,
    }))
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let id = format!("{:016x}", rand::random::<u64>());
    let session = Session::new(state.catalog.price_bounds);
    let body = session_json(&id, &session);

    state.sessions.insert(id.clone(), Arc::new(Mutex::new(session))).await;
    tracing::debug!("Created session {}", id);

    (StatusCode::CREATED, Json(body))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;
    session.begin_cycle();
    Ok(Json(session_json(&id, &session)))
}

async fn apply_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(event): Json<FilterEvent>,
) -> Result<Json<Value>, AppError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;
    session.begin_cycle();

    let controller = SyncController::new(&state.catalog.index);
    session
        .apply(&controller, event)
        .map_err(|e| AppError::Rejected(e.to_string()))?;

    Ok(Json(session_json(&id, &session)))
}

async fn request_reset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;
    session.begin_cycle();
    session.request_reset();
    Ok((StatusCode::ACCEPTED, Json(session_json(&id, &session))))
}

async fn request_search(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;
    session.begin_cycle();
    session.request_search();
    Ok(Json(session_json(&id, &session)))
}

/// Preview (top picks) before the first search, filtered results after
async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let session = state.session(&id).await?;
    let catalog = state.catalog.clone();
    let engine = QueryEngine::new(&catalog.restaurants);

    // Everything read from the session happens under one lock; the insight
    // request runs after it is released.
    let (mut body, prompt) = {
        let mut session = session.lock().await;
        let reset_applied = session.begin_cycle();
        let signals = json!({
            "filters_changed": session.take_filters_changed(),
            "perfect_match": session.take_perfect_match(),
        });

        if !session.search_requested() {
            let picks = engine.top_rated(TOP_PICKS);
            let body = json!({
                "mode": "preview",
                "reset_applied": reset_applied,
                "signals": signals,
                "state": session.state(),
                "count": picks.len(),
                "restaurants": picks,
            });
            (body, None)
        } else {
            let result = engine.query(session.state());
            let prompt = result.featured().map(restaurant_prompt);
            let body = json!({
                "mode": "results",
                "reset_applied": reset_applied,
                "signals": signals,
                "state": session.state(),
                "count": result.count,
                "restaurants": result.restaurants,
                "aggregates": result.aggregates,
            });
            (body, prompt)
        }
    };

    if let Some(prompt) = prompt {
        body["insight"] = Value::String(state.insight.generate(&prompt).await);
    }

    Ok(Json(body))
}

fn session_json(id: &str, session: &Session) -> Value {
    json!({
        "session_id": id,
        "state": session.state(),
        "reset_pending": session.reset_pending(),
        "search_requested": session.search_requested(),
    })
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    NotFound(String),
    Rejected(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Rejected(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
