//! HTTP transport for ProServe website submissions.
//!
//! Exposes the submission service as JSON endpoints:
//!
//! - `POST|GET /api/inquiries`, `GET /api/inquiries/:id`
//! - `POST|GET /api/service-requests`, `GET /api/service-requests/:id`,
//!   `POST /api/service-requests/:service_type`
//! - `POST|GET /api/registration-assistance`,
//!   `GET /api/registration-assistance/:id`
//! - `GET /api/health`

pub mod handlers;
pub mod middleware;
pub mod routes;

use axum::Router;
use proserve_core::SubmissionService;
use std::sync::Arc;

/// Listener settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl ServerConfig {
    /// Socket address in `host:port` form.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Shared application state
pub struct AppState {
    service: SubmissionService,
    store_backend: &'static str,
}

impl AppState {
    pub fn new(service: SubmissionService, store_backend: &'static str) -> Self {
        Self {
            service,
            store_backend,
        }
    }

    pub fn service(&self) -> &SubmissionService {
        &self.service
    }

    pub fn store_backend(&self) -> &'static str {
        self.store_backend
    }
}

/// Builds the complete router with request logging.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}
