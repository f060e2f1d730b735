//! Entity-agnostic handlers
//!
//! The router binds an `EntityKind` to each route, so one handler serves
//! every table without per-entity duplication.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::infrastructure::AppState;
use crate::models::EntityKind;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReadParams {
    /// Also return soft-deleted rows
    #[serde(default)]
    pub include_deleted: bool,
}

/// Restore a soft-deleted row
#[utoipa::path(
    put,
    path = "/api/{kind}/{id}/restore",
    params(
        ("kind" = String, Path, description = "Entity collection, e.g. products"),
        ("id" = i32, Path, description = "Row identifier")
    ),
    responses(
        (status = 200, description = "Entity restored, body carries the affected row count"),
        (status = 404, description = "Entity not found or already restored"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn recover_entity(
    kind: EntityKind,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response {
    match state.registry.repository(kind).restore(id).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Entidad no encontrada o ya restaurada."})),
        )
            .into_response(),
        Ok(count) => {
            tracing::info!("Restored {} {} ({} row(s))", kind, id, count);
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Entidad restaurada con éxito.",
                    "result": count
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Error al restaurar entidad {} {}: {}", kind, id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Ocurrió un error al restaurar la entidad.",
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// Soft-delete a live row
#[utoipa::path(
    delete,
    path = "/api/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "Entity collection, e.g. products"),
        ("id" = i32, Path, description = "Row identifier")
    ),
    responses(
        (status = 200, description = "Entity marked as deleted"),
        (status = 404, description = "Entity not found or already deleted"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn delete_entity(
    kind: EntityKind,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response {
    match state.registry.repository(kind).soft_delete(id).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Entidad no encontrada o ya eliminada."})),
        )
            .into_response(),
        Ok(count) => {
            tracing::info!("Soft-deleted {} {}", kind, id);
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Entidad eliminada con éxito.",
                    "result": count
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Error al eliminar entidad {} {}: {}", kind, id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Ocurrió un error al eliminar la entidad.",
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// Read one row. Soft-deleted rows stay hidden unless `?include_deleted=true`
#[utoipa::path(
    get,
    path = "/api/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "Entity collection, e.g. products"),
        ("id" = i32, Path, description = "Row identifier"),
        ReadParams
    ),
    responses(
        (status = 200, description = "Row keyed by the entity's singular name"),
        (status = 404, description = "Entity not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_entity(
    kind: EntityKind,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<ReadParams>,
) -> Response {
    match state
        .registry
        .repository(kind)
        .find(id, params.include_deleted)
        .await
    {
        Ok(Some(row)) => (StatusCode::OK, Json(json!({ kind.singular(): row }))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("{} not found", kind)})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to read {} {}: {}", kind, id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("Database error: {}", e)})),
            )
                .into_response()
        }
    }
}
