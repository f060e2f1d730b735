// Server module - startup wiring and the HTTP router

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api_docs::ApiDoc;
use crate::domain::{AssociationGraph, DomainError};
use crate::infrastructure::{config::Config, db, AppState, Registry};

/// Bring up the persistence layer in its required order: tables first,
/// then the association graph, then the registry handed to controllers.
pub async fn build_state(config: &Config) -> Result<AppState, DomainError> {
    let db = db::init_db(&config.database_url).await?;
    let graph = AssociationGraph::standard()?;
    let registry = Registry::build(db, graph)?;
    Ok(AppState::new(registry))
}

/// Build the API router with CORS, request tracing and Swagger UI
pub fn build_router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    let mut origins = Vec::new();
    for origin in cors_allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(v) => origins.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api::api_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
