//! HTTP routes and handlers

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bhavna_core::{ConversationSummary, StatementAnalysis, Turn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::state::AppState;

/// Session cookie name
pub const SESSION_COOKIE: &str = "user_id";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .route("/analysis", get(analysis))
        .route("/reset", post(reset))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub bot_response: String,
    pub user_sentiment: StatementAnalysis,
    pub history: Vec<Turn>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub summary: ConversationSummary,
    pub history_scores: Vec<f64>,
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn index(headers: HeaderMap) -> Response {
    let (session_id, minted) = session_id(&headers);
    let body = Json(json!({
        "message": "Namaste! Tell me how you're feeling, in English, Hindi or Hinglish.",
    }));
    with_session_cookie(body.into_response(), &session_id, minted)
}

async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response {
    let (session_id, minted) = session_id(&headers);
    let session = state.sessions.get_or_create(&session_id);

    let mut conversation = session.lock().await;
    let exchange = conversation
        .process_user_input(&state.engine, state.replies.as_ref(), &request.message)
        .await;
    debug!(
        session = %session_id,
        label = %exchange.user_sentiment.label,
        source = %exchange.user_sentiment.source,
        "Processed chat message"
    );

    let body = Json(ChatResponse {
        bot_response: exchange.bot_response,
        user_sentiment: exchange.user_sentiment,
        history: conversation.history().to_vec(),
    });
    drop(conversation);

    with_session_cookie(body.into_response(), &session_id, minted)
}

async fn analysis(State(state): State<AppState>, headers: HeaderMap) -> Json<AnalysisResponse> {
    let session = cookie_value(&headers, SESSION_COOKIE).and_then(|id| state.sessions.get(&id));

    let response = match session {
        Some(session) => {
            let conversation = session.lock().await;
            AnalysisResponse {
                summary: conversation.summary(),
                history_scores: conversation.history_scores(),
            }
        }
        None => AnalysisResponse {
            summary: ConversationSummary::empty(),
            history_scores: Vec::new(),
        },
    };

    Json(response)
}

async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
    if let Some(id) = cookie_value(&headers, SESSION_COOKIE) {
        state.sessions.reset(&id);
        debug!(session = %id, "Session reset");
    }
    Json(json!({ "status": "reset" }))
}

/// Session id from the cookie, or a fresh one. The flag is `true` when minted.
fn session_id(headers: &HeaderMap) -> (String, bool) {
    match cookie_value(headers, SESSION_COOKIE) {
        Some(id) => (id, false),
        None => (uuid::Uuid::new_v4().to_string(), true),
    }
}

/// Read a cookie from the `Cookie` request headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn with_session_cookie(mut response: Response, session_id: &str, minted: bool) -> Response {
    if minted {
        let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
