//! Streamable-HTTP transport
//!
//! One JSON-RPC exchange per `POST /mcp`. Every request gets its own
//! [`Session`]; nothing is kept between requests.

mod session;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

pub use session::{Inbound, Session, SessionId, SessionTracker};

use crate::mcp::protocol::codes;
use crate::mcp::{McpResponse, McpServer};
use crate::types::ResponseMode;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    server: Arc<McpServer>,
    sessions: SessionTracker,
    mode: ResponseMode,
}

impl AppState {
    pub fn new(server: Arc<McpServer>, mode: ResponseMode) -> Self {
        Self {
            server,
            sessions: SessionTracker::new(),
            mode,
        }
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }
}

/// HTTP server
pub struct HttpTransport {
    state: AppState,
    addr: SocketAddr,
}

impl HttpTransport {
    pub fn new(server: Arc<McpServer>, mode: ResponseMode, addr: SocketAddr) -> Self {
        Self {
            state: AppState::new(server, mode),
            addr,
        }
    }

    /// Build the router
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/mcp", post(mcp_handler))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind and serve until Ctrl-C. Bind failures are returned to the caller.
    pub async fn start(self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!(
            "Demo MCP Server running on http://{}/mcp",
            listener.local_addr()?
        );

        axum::serve(listener, Self::router(self.state))
            .with_graceful_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for shutdown signal: {}", e);
                    std::future::pending::<()>().await;
                }
                tracing::info!("Shutting down");
            })
            .await
    }
}

/// Health check endpoint
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "activeSessions": state.sessions.active_count(),
    }))
}

/// `POST /mcp`: open a session, dispatch, write the response, release
async fn mcp_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let inbound = match Inbound::parse(&body) {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::debug!("unparseable request body: {}", e);
            let response =
                McpResponse::error(None, codes::PARSE_ERROR, format!("Parse error: {e}"));
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };
    let batch = matches!(inbound, Inbound::Batch(_));

    let session = Session::open(state.server.clone(), &state.sessions);
    let span = tracing::info_span!("session", id = %session.id());
    let responses = session.handle(inbound).instrument(span).await;
    drop(session);

    if responses.is_empty() {
        return StatusCode::ACCEPTED.into_response();
    }

    match state.mode {
        ResponseMode::Json if batch => Json(responses).into_response(),
        ResponseMode::Json => match responses.into_iter().next() {
            Some(response) => Json(response).into_response(),
            None => StatusCode::ACCEPTED.into_response(),
        },
        ResponseMode::Sse => {
            let events = responses.into_iter().map(|response| {
                let event = Event::default()
                    .event("message")
                    .json_data(&response)
                    .unwrap_or_else(|e| {
                        tracing::error!("Failed to encode response event: {}", e);
                        Event::default().event("message").data("{}")
                    });
                Ok::<_, Infallible>(event)
            });
            Sse::new(stream::iter(events)).into_response()
        }
    }
}
