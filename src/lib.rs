//! Fleet Rental
//!
//! Núcleo de reservas de una flota de alquiler (vehículos, conductores,
//! rutas y promociones) con una API HTTP fina encima.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use middleware::cors::cors_middleware;
use state::AppState;

/// Peticiones atendidas a la vez como máximo
const MAX_CONCURRENT_REQUESTS: usize = 512;

/// Router completo de la API
pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/rentals", routes::rental_routes::create_rental_router())
        .nest("/api/customers", routes::rental_routes::create_customer_router())
        .nest("/api/vehicle", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/invoices", routes::invoice_routes::create_invoice_router())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-rental",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
