// Copyright (C) 2026 StarHuntingGames
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

mod config;
mod dynamo;

use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{ConnectInfo, FromRequestParts, Path, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
    routing::get,
};
use lambda_http::run as lambda_run;
use observer_common::{ChunkId, GameId, GameMetadata, KeyframeId, LastChunkInfo};
use replay_observer::{
    Artifact, ChunkPoll, HttpVersionSource, MemorySessionCache, NullSessionCache, ObserverError,
    ObserverSettings, ReplayDirectory, ReplayObserver, SessionCache, TracingSink,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use crate::{
    config::{CacheBackend, ObserverConfig},
    dynamo::DynamoSessionCache,
};

const CONSUMER_PREFIX: &str = "/observer-mode/rest/consumer";

#[derive(Clone)]
struct AppState {
    observer: Arc<ReplayObserver>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "observer_service=debug,replay_observer=info,tower_http=info".to_string()
        }))
        .init();

    let config = ObserverConfig::load()?;
    let observer = build_observer(&config).await?;
    info!(
        replays_dir = %config.replays_dir.display(),
        cache_backend = ?config.cache_backend,
        auth_strict = config.auth_strict,
        "replay observer ready"
    );

    let app = build_router(AppState {
        observer: Arc::new(observer),
    });

    if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("AWS Lambda runtime detected; running observer-service in lambda mode");
        lambda_run(app)
            .await
            .map_err(|e| anyhow::Error::msg(format!("lambda runtime error: {e}")))?;
        return Ok(());
    }

    let bind_addr: SocketAddr = config
        .bind
        .parse()
        .context(format!("invalid OBSERVER_BIND {}", config.bind))?;
    info!(%bind_addr, "observer-service listening");
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

async fn build_observer(config: &ObserverConfig) -> anyhow::Result<ReplayObserver> {
    let cache: Arc<dyn SessionCache> = match config.cache_backend {
        CacheBackend::Memory => Arc::new(MemorySessionCache::new()),
        CacheBackend::Dynamodb => {
            Arc::new(DynamoSessionCache::from_env(config.cache_table.clone()).await)
        }
        CacheBackend::None => Arc::new(NullSessionCache),
    };

    let versions = HttpVersionSource::new(
        config.upstream_base_url.clone(),
        Duration::from_secs(config.upstream_timeout_seconds),
    )
    .context("failed to create upstream spectator client")?;

    ReplayObserver::new(
        ReplayDirectory::new(&config.replays_dir),
        cache,
        Arc::new(versions),
        Some(Arc::new(TracingSink)),
        ObserverSettings {
            cache_namespace: config.cache_namespace.clone(),
            strict_auth: config.auth_strict,
        },
    )
    .context("invalid replay observer configuration")
}

fn build_router(state: AppState) -> Router {
    let consumer = Router::new()
        .route("/version", get(version_handler))
        .route(
            "/getGameMetaData/{region}/{game_id}/{token}/token",
            get(game_metadata_handler),
        )
        .route(
            "/getLastChunkInfo/{region}/{game_id}/{chunk_id}/token",
            get(last_chunk_info_handler),
        )
        .route(
            "/getGameDataChunk/{region}/{game_id}/{chunk_id}/token",
            get(chunk_handler),
        )
        .route(
            "/getKeyFrame/{region}/{game_id}/{keyframe_id}/token",
            get(keyframe_handler),
        )
        .route(
            "/endOfGameStats/{region}/{game_id}/null",
            get(end_stats_handler),
        );

    Router::new()
        .route("/health", get(health))
        .nest(CONSUMER_PREFIX, consumer)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true, "service": "observer-service"}))
}

/// Who is watching: the first `X-Forwarded-For` hop, else the peer address.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewerIdentity(String);

impl<S: Send + Sync> FromRequestParts<S> for ViewerIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        if let Some(forwarded) = forwarded {
            return Ok(Self(forwarded));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(Self(peer))
    }
}

/// The game client never sends `Accept`; browsers always do.
fn accept_header_present(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .is_some_and(|value| !value.as_bytes().is_empty())
}

async fn version_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<String, ApiError> {
    let version = state
        .observer
        .version(accept_header_present(&headers))
        .await?;
    Ok(version)
}

async fn game_metadata_handler(
    State(state): State<AppState>,
    Path((region, game_id, _token)): Path<(String, GameId, String)>,
    viewer: ViewerIdentity,
) -> Result<Json<GameMetadata>, ApiError> {
    let metadata = state
        .observer
        .game_metadata(&region, game_id, &viewer.0)
        .await?;
    Ok(Json(metadata))
}

async fn last_chunk_info_handler(
    State(state): State<AppState>,
    Path((region, game_id, client_chunk_id)): Path<(String, GameId, ChunkId)>,
    viewer: ViewerIdentity,
) -> Result<Json<LastChunkInfo>, ApiError> {
    debug!(
        %region,
        game_id,
        client_chunk_id,
        viewer = %viewer.0,
        "getLastChunkInfo requested"
    );

    match state
        .observer
        .poll_last_chunk_info(&region, game_id, &viewer.0)
        .await?
    {
        ChunkPoll::Ready(info) => Ok(Json(info)),
        ChunkPoll::Rejected => Err(ApiError::forbidden(
            "trying to access without cached current chunk id",
        )),
    }
}

async fn chunk_handler(
    State(state): State<AppState>,
    Path((region, game_id, chunk_id)): Path<(String, GameId, ChunkId)>,
) -> Result<Response, ApiError> {
    artifact_response(&state, &region, game_id, Artifact::Chunk(chunk_id)).await
}

async fn keyframe_handler(
    State(state): State<AppState>,
    Path((region, game_id, keyframe_id)): Path<(String, GameId, KeyframeId)>,
) -> Result<Response, ApiError> {
    artifact_response(&state, &region, game_id, Artifact::Keyframe(keyframe_id)).await
}

async fn end_stats_handler(
    State(state): State<AppState>,
    Path((region, game_id)): Path<(String, GameId)>,
) -> Result<Response, ApiError> {
    artifact_response(&state, &region, game_id, Artifact::EndStats).await
}

async fn artifact_response(
    state: &AppState,
    region: &str,
    game_id: GameId,
    artifact: Artifact,
) -> Result<Response, ApiError> {
    let bytes = state
        .observer
        .artifact_content(region, game_id, artifact)
        .await?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    )
        .into_response())
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }
}

impl From<ObserverError> for ApiError {
    fn from(error: ObserverError) -> Self {
        let status = match &error {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            ObserverError::Unauthorized => StatusCode::FORBIDDEN,
            ObserverError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ObserverError::Cache(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, message = %self.message, "request failed");
        (
            self.status,
            Json(serde_json::json!({"error": self.message})),
        )
            .into_response()
    }
}
