//! Route definitions for the submission API.

use crate::handlers;
use crate::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// API routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/inquiries",
            get(handlers::list_inquiries).post(handlers::create_inquiry),
        )
        .route("/api/inquiries/:id", get(handlers::get_inquiry))
        .route(
            "/api/service-requests",
            get(handlers::list_service_requests).post(handlers::create_service_request),
        )
        // One segment, two meanings: record id on GET, service type on POST.
        .route(
            "/api/service-requests/:id",
            get(handlers::get_service_request).post(handlers::create_service_request_for),
        )
        .route(
            "/api/registration-assistance",
            get(handlers::list_registration_assistance)
                .post(handlers::create_registration_assistance),
        )
        .route(
            "/api/registration-assistance/:id",
            get(handlers::get_registration_assistance),
        )
}
