use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::card::action_for;
use crate::card::config_editor;
use crate::card::stub_config;
use crate::card::ActionConfig;
use crate::card::CardConfig;
use crate::card::CardInfo;
use crate::card::EditorSchema;
use crate::card::Gesture;
use crate::card::PresentationDescriptor;
use crate::card::Presenter;
use crate::card::ResolvedCardConfig;
use crate::card::CARD_INFO;
use crate::card::CARD_SIZE;
use crate::entity::EntityStates;

/// Response for the /v1/ping endpoint
#[derive(Serialize)]
struct PingResponse {
    status: String,
}

/// Response for the /v1/info endpoint
#[derive(Serialize)]
struct InfoResponse {
    version: String,
    hostname: String,
}

/// Response for the /v1/tiles endpoint
#[derive(Serialize)]
struct TilesResponse<'a> {
    card: CardInfo,
    card_size: u32,
    tiles: &'a BTreeMap<String, ResolvedCardConfig>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("unknown tile '{0}'")]
    UnknownTile(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::UnknownTile(_) => StatusCode::NOT_FOUND,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Shared application state
struct AppState {
    version: &'static str,
    tiles: BTreeMap<String, ResolvedCardConfig>,
    presenter: Presenter,
}

impl AppState {
    fn tile(&self, tile_id: &str) -> Result<&ResolvedCardConfig, ApiError> {
        self.tiles
            .get(tile_id)
            .ok_or_else(|| ApiError::UnknownTile(tile_id.to_string()))
    }
}

/// Handler for GET /v1/ping
#[tracing::instrument]
async fn ping() -> impl IntoResponse {
    tracing::debug!("Handling /v1/ping request");
    (
        StatusCode::OK,
        Json(PingResponse {
            status: "ok".to_string(),
        }),
    )
}

/// Handler for GET /v1/info
#[tracing::instrument(skip(state))]
async fn info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("Handling /v1/info request");

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    (
        StatusCode::OK,
        Json(InfoResponse {
            version: state.version.to_string(),
            hostname,
        }),
    )
}

/// Handler for GET /v1/tiles
#[tracing::instrument(skip(state))]
async fn list_tiles(State(state): State<Arc<AppState>>) -> Response {
    tracing::debug!("Handling /v1/tiles request");
    Json(TilesResponse {
        card: CARD_INFO,
        card_size: CARD_SIZE,
        tiles: &state.tiles,
    })
    .into_response()
}

/// Handler for POST /v1/tiles/:tile_id/present
///
/// The body is the host's current entity states; `null` means the host has
/// none yet. Responds with `null` when there is nothing to render.
#[tracing::instrument(skip(state, states))]
async fn present_tile(
    State(state): State<Arc<AppState>>,
    Path(tile_id): Path<String>,
    Json(states): Json<Option<EntityStates>>,
) -> Result<Json<Option<PresentationDescriptor>>, ApiError> {
    let config = state.tile(&tile_id)?;
    let descriptor = state.presenter.present(states.as_ref(), config);
    tracing::debug!(rendered = descriptor.is_some(), "Presented tile");
    Ok(Json(descriptor))
}

/// Handler for GET /v1/tiles/:tile_id/actions/:gesture
#[tracing::instrument(skip(state))]
async fn tile_action(
    State(state): State<Arc<AppState>>,
    Path((tile_id, gesture)): Path<(String, Gesture)>,
) -> Result<Json<Option<ActionConfig>>, ApiError> {
    let config = state.tile(&tile_id)?;
    Ok(Json(action_for(config, gesture).cloned()))
}

/// Handler for POST /v1/stub-config
#[tracing::instrument(skip(entity_ids))]
async fn stub(Json(entity_ids): Json<Vec<String>>) -> Json<CardConfig> {
    tracing::debug!(candidates = entity_ids.len(), "Handling /v1/stub-config request");
    Json(stub_config(entity_ids.iter().map(String::as_str)))
}

/// Handler for GET /v1/editor
async fn editor() -> Json<&'static EditorSchema> {
    Json(config_editor())
}

/// Create the API router with all endpoints
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/ping", get(ping))
        .route("/v1/info", get(info))
        .route("/v1/tiles", get(list_tiles))
        .route("/v1/tiles/:tile_id/present", post(present_tile))
        .route("/v1/tiles/:tile_id/actions/:gesture", get(tile_action))
        .route("/v1/stub-config", post(stub))
        .route("/v1/editor", get(editor))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP API server
///
/// Serves the configured tiles until the shutdown signal fires.
///
/// # Arguments
/// * `listen` - The IP address to listen on (e.g., "127.0.0.1")
/// * `port` - The port to listen on (e.g., 8565)
/// * `tiles` - Resolved tile configs keyed by tile id
/// * `shutdown_rx` - A oneshot receiver that will trigger graceful shutdown
pub async fn serve(
    listen: String,
    port: u16,
    tiles: BTreeMap<String, ResolvedCardConfig>,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        version: env!("CARGO_PKG_VERSION"),
        tiles,
        presenter: Presenter::new(),
    });
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", listen, port).parse()?;
    tracing::info!("Starting HTTP API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            tracing::info!("HTTP API server shutting down gracefully");
        })
        .await?;

    Ok(())
}
