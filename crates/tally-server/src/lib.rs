//! Tally server library logic.
//!
//! Three resource modules (clients, projects, payments) each wire four
//! handlers onto a collection route and an item route. The same routes are
//! mounted twice, bare and under `/api`, because both prefixes are part of
//! the public surface.

pub mod api_clients;
pub mod api_payments;
pub mod api_projects;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tally_db::DbPool;
use tally_ledger::LedgerError;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (1 MiB). The payloads here are small records;
/// anything bigger is a mistake.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Maps a [`LedgerError`] to an HTTP status code, logging server-side
/// failures.
///
/// A constraint violation (duplicate id, foreign key pointing at no row) is
/// the caller's fault → 409. Everything else → 500.
pub(crate) fn ledger_err_to_status(e: LedgerError) -> StatusCode {
    if e.is_constraint_violation() {
        return StatusCode::CONFLICT;
    }
    tracing::error!(error = %e, "ledger operation failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Health check handler.
///
/// Answers without touching the store, so it keeps working even when the
/// database is misconfigured or down.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// The resource routes, built once per mount point.
fn resource_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/clients",
            get(api_clients::list_clients_handler).post(api_clients::create_client_handler),
        )
        .route(
            "/clients/{id}",
            put(api_clients::update_client_handler).delete(api_clients::delete_client_handler),
        )
        .route(
            "/projects",
            get(api_projects::list_projects_handler).post(api_projects::create_project_handler),
        )
        .route(
            "/projects/{id}",
            put(api_projects::update_project_handler).delete(api_projects::delete_project_handler),
        )
        .route(
            "/payments",
            get(api_payments::list_payments_handler).post(api_payments::create_payment_handler),
        )
        .route(
            "/payments/{id}",
            put(api_payments::update_payment_handler).delete(api_payments::delete_payment_handler),
        )
}

/// Builds the application router with all routes.
///
/// `/clients` and `/api/clients` (and so on for every route, health
/// included) are equivalent aliases.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(resource_routes())
        .nest("/api", resource_routes())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
