use super::handlers;
use crate::application::admin::AdminCheck;
use crate::application::payments::PaymentService;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Services shared by all handlers. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub payments: Arc<PaymentService>,
    pub admin: Arc<AdminCheck>,
}

impl AppState {
    pub fn new(payments: PaymentService, admin: AdminCheck) -> Self {
        Self {
            payments: Arc::new(payments),
            admin: Arc::new(admin),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/create-invoice", post(handlers::create_invoice))
        .route(
            "/api/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .route(
            "/api/update-payment-status",
            post(handlers::update_payment_status),
        )
        .route("/api/check-admin", get(handlers::check_admin))
        .route("/api/get-invoice", get(handlers::get_invoice))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
