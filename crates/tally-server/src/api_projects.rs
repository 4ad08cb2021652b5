//! HTTP handlers for the project resource.

use crate::{ledger_err_to_status, AppState};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tally_ledger::projects::{
    create_project, delete_project, list_projects, update_project, NewProject, Project,
    ProjectUpdate,
};

/// GET /projects
pub async fn list_projects_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Project>>, StatusCode> {
    let projects = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for list_projects");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        list_projects(&conn).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "list_projects task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(projects))
}

/// POST /projects
///
/// Client existence is not pre-checked: an unknown `clientId` comes back as
/// a constraint conflict from the store, leaving no partial row.
pub async fn create_project_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), StatusCode> {
    let created = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for create_project");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        create_project(&conn, &payload).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "create_project task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /projects/{id}
///
/// An unknown id yields a `null` body with 200, not a 404.
pub async fn update_project_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<Json<Option<Project>>, StatusCode> {
    let updated = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for update_project");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        update_project(&conn, &id, &payload).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "update_project task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(updated))
}

/// DELETE /projects/{id}
pub async fn delete_project_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for delete_project");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        delete_project(&conn, &id).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "delete_project task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(StatusCode::NO_CONTENT)
}
