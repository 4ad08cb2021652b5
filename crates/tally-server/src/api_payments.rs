//! HTTP handlers for the payment resource.
//!
//! The update path is deliberately narrower than the other resources: only
//! `status` and `receivedAt` move after creation.

use crate::{ledger_err_to_status, AppState};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tally_ledger::payments::{
    create_payment, delete_payment, list_payments, update_payment, NewPayment, Payment,
    PaymentUpdate,
};

/// GET /payments
pub async fn list_payments_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Payment>>, StatusCode> {
    let payments = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for list_payments");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        list_payments(&conn).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "list_payments task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(payments))
}

/// POST /payments
pub async fn create_payment_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<NewPayment>,
) -> Result<(StatusCode, Json<Payment>), StatusCode> {
    let created = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for create_payment");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        create_payment(&conn, &payload).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "create_payment task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /payments/{id}
///
/// An unknown id yields a `null` body with 200, not a 404.
pub async fn update_payment_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<PaymentUpdate>,
) -> Result<Json<Option<Payment>>, StatusCode> {
    let updated = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for update_payment");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        update_payment(&conn, &id, &payload).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "update_payment task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(updated))
}

/// DELETE /payments/{id}
pub async fn delete_payment_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for delete_payment");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        delete_payment(&conn, &id).map_err(ledger_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "delete_payment task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(StatusCode::NO_CONTENT)
}
