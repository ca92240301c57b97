use crate::aggregation::AggregationPipeline;
use crate::config::Config;
use crate::errors::{AppError, ErrorBody};
use crate::models::*;
use crate::upstream_client::UpstreamClient;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Pooled HTTP client used by every pipeline run.
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let upstream = UpstreamClient::new(config.upstream_timeout())?;
        Ok(Self { config, upstream })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_aggregated_data),
    components(schemas(
        AggregatedResult,
        PersonProfile,
        CountryProfile,
        ExchangeRateSummary,
        NewsArticle,
        ErrorBody
    )),
    tags((name = "aggregation", description = "Person, country, rates and news in one call"))
)]
pub struct ApiDoc;

/// Health check endpoint.
///
/// Returns the service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "aggregation",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/data
///
/// Runs the aggregation pipeline once. Degraded upstreams show up as sentinel
/// values inside a 200; only an identity failure produces a 500.
///
/// # Returns
///
/// * `Result<Json<AggregatedResult>, AppError>` - The composite record or the fatal error.
#[utoipa::path(
    get,
    path = "/api/data",
    tag = "aggregation",
    responses(
        (status = 200, description = "Composite record", body = AggregatedResult),
        (status = 500, description = "Identity upstream failed", body = ErrorBody)
    )
)]
pub async fn get_aggregated_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AggregatedResult>, AppError> {
    tracing::info!("GET /api/data");

    let pipeline = AggregationPipeline::new(&state.config, state.upstream.clone());
    let result = pipeline.run().await.map_err(|e| {
        tracing::error!("Error when receiving API data: {}", e);
        e
    })?;

    tracing::info!(
        "Aggregated data for {} {} ({}): {} articles",
        result.profile.first_name,
        result.profile.last_name,
        result.country.name,
        result.news.len()
    );

    Ok(Json(result))
}

/// Builds the full application router.
///
/// `/` serves `index.html` from the static directory and any other unknown
/// path falls through to the static files.
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();
    let index_page = ServeFile::new(Path::new(&static_dir).join("index.html"));

    Router::new()
        .route("/health", get(health))
        .route("/api/data", get(get_aggregated_data))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route_service("/", index_page)
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
