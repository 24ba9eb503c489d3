use crate::aggregate::aggregate;
use crate::config::Config;
use crate::error::{ApiPath, ApiQuery, AppError};
use crate::models::{AggregatedResult, MediaKind};
use crate::plan::CollectionPlan;
use crate::status::{Reachability, StatusProbe, StatusReport};
use crate::tmdb::{TmdbApi, TmdbClient};
use crate::video;
use anyhow::Result;
use axum::{
    extract::State,
    http::{header, Method},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{net::SocketAddr, path::Path as FsPath, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub status: Arc<StatusProbe>,
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
    )?);
    let status = Arc::new(StatusProbe::for_mirrors(config.probe_timeout)?);
    info!(
        "Mirror probes use a {}s timeout",
        config.probe_timeout.as_secs()
    );

    let state = AppState { tmdb, status };
    let app = build_router(state, Some(config.static_dir.as_path()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState, static_dir: Option<&FsPath>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes());

    match static_dir {
        Some(dir) if dir.is_dir() => {
            info!("Serving static files from {:?}", dir);
            app = app.fallback_service(
                ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
            );
        }
        Some(dir) => warn!("Static directory {:?} not found, serving API only", dir),
        None => {}
    }

    // Layers go on last so static files get CORS headers and request logs too.
    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/trending/:kind", get(trending))
        .route("/genres", get(genres))
        .route("/movies/genre/:id", get(movies_by_genre))
        .route("/search", get(search))
        .route("/video-sources/:kind/:id", get(video_source))
        .route("/video/:kind/:id", get(video_source))
        .route("/movies/collection", get(movie_collection))
        .route("/tv/collection", get(tv_collection))
        .route("/anime/collection", get(anime_collection))
        .route("/server-status", get(server_status))
        .fallback(api_not_found)
}

async fn health() -> &'static str {
    "OK"
}

async fn run_plan(state: &AppState, plan: CollectionPlan) -> Json<AggregatedResult> {
    info!("Fetching {}", plan.label);
    let results = aggregate(state.tmdb.as_ref(), &plan).await;
    info!("Found {} items for {}", results.len(), plan.label);
    Json(AggregatedResult { results })
}

async fn trending(
    State(state): State<AppState>,
    ApiPath(segment): ApiPath<String>,
) -> Result<Json<AggregatedResult>, AppError> {
    Ok(run_plan(&state, CollectionPlan::trending(&segment)).await)
}

async fn genres(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    info!("Fetching genres list");
    let data = state.tmdb.fetch_genres().await.map_err(|e| {
        warn!("Genre list request failed: {:#}", e);
        AppError::upstream("Failed to fetch genres")
    })?;
    let count = data
        .get("genres")
        .and_then(|g| g.as_array())
        .map(|g| g.len())
        .unwrap_or(0);
    info!("Found {} genres", count);
    Ok(Json(data))
}

async fn movies_by_genre(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<AggregatedResult>, AppError> {
    let genre_id: i64 = id
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("Invalid genre id '{}'", id)))?;
    Ok(run_plan(&state, CollectionPlan::movie_genre(genre_id)).await)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<AggregatedResult>, AppError> {
    let Some(query) = params.query.filter(|q| !q.is_empty()) else {
        info!("Search rejected: empty query");
        return Err(AppError::bad_request("Query parameter is required"));
    };
    Ok(run_plan(&state, CollectionPlan::search(&query)).await)
}

#[derive(Debug, Deserialize)]
struct VideoParams {
    server: Option<String>,
}

async fn video_source(
    ApiPath((kind, id)): ApiPath<(String, String)>,
    ApiQuery(params): ApiQuery<VideoParams>,
) -> Result<Json<Value>, AppError> {
    let (Ok(kind), Ok(id)) = (kind.parse::<MediaKind>(), id.trim().parse::<i64>()) else {
        return Err(AppError::bad_request("Invalid parameters"));
    };
    let embed_url = video::resolve(kind, id, params.server.as_deref());
    info!(
        "Resolved {} {} on {} -> {}",
        kind,
        id,
        params.server.as_deref().unwrap_or("default"),
        embed_url
    );
    Ok(Json(json!({ "embedURL": embed_url })))
}

async fn movie_collection(State(state): State<AppState>) -> Json<AggregatedResult> {
    run_plan(&state, CollectionPlan::movie_collection()).await
}

async fn tv_collection(State(state): State<AppState>) -> Json<AggregatedResult> {
    run_plan(&state, CollectionPlan::tv_collection()).await
}

async fn anime_collection(State(state): State<AppState>) -> Json<AggregatedResult> {
    run_plan(&state, CollectionPlan::anime_collection()).await
}

async fn server_status(State(state): State<AppState>) -> Json<StatusReport> {
    let report = state.status.check().await;
    let online = report
        .servers
        .iter()
        .filter(|s| s.status == Reachability::Online)
        .count();
    info!("{}/{} mirrors online", online, report.servers.len());
    Json(report)
}

async fn api_not_found() -> AppError {
    AppError::NotFound("API endpoint not found".to_string())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
