//! HTTP handlers for the client resource.

use crate::{ledger_err_to_status, AppState};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tally_ledger::clients::{
    create_client, delete_client, list_clients, update_client, Client, ClientUpdate, NewClient,
};

/// GET /clients
pub async fn list_clients_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Client>>, StatusCode> {
    let clients = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for list_clients");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        list_clients(&conn).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "list_clients task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(clients))
}

/// POST /clients
pub async fn create_client_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<NewClient>,
) -> Result<(StatusCode, Json<Client>), StatusCode> {
    let created = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for create_client");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        create_client(&conn, &payload).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "create_client task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /clients/{id}
///
/// An unknown id yields a `null` body with 200, not a 404.
pub async fn update_client_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ClientUpdate>,
) -> Result<Json<Option<Client>>, StatusCode> {
    let updated = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for update_client");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        update_client(&conn, &id, &payload).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "update_client task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(updated))
}

/// DELETE /clients/{id}
///
/// 204 whether or not a row existed; dependents go with it via the store's
/// cascade rules.
pub async fn delete_client_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for delete_client");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        delete_client(&conn, &id).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "delete_client task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(StatusCode::NO_CONTENT)
}
