//! # HTTP Server
//!
//! Combines the attribute, work paper and conclusion routers behind CORS.

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::audit::AuditService;
use crate::engine::NARRATIVE_FORMAT_VERSION;
use crate::observability::{log_event_with_fields, Event};

use super::attribute_routes::attribute_routes;
use super::conclusion_routes::conclusion_routes;
use super::config::HttpServerConfig;
use super::work_paper_routes::work_paper_routes;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub narrative_format_version: u32,
}

pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(service: Arc<AuditService>) -> Self {
        Self::with_config(HttpServerConfig::default(), service)
    }

    pub fn with_config(config: HttpServerConfig, service: Arc<AuditService>) -> Self {
        let router = Self::build_router(&config, service);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, service: Arc<AuditService>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            // Validated at config load; anything unparsable is left out.
            let origins = config.origin_values().unwrap_or_default();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let api = Router::new()
            .merge(attribute_routes(service.clone()))
            .merge(work_paper_routes(service.clone()))
            .merge(conclusion_routes(service));

        Router::new()
            .route("/health", get(health_handler))
            .nest("/api", api)
            .layer(cors)
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self
            .config
            .bind_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(Event::Serving, &[("addr", &addr.to_string())]);
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            narrative_format_version: NARRATIVE_FORMAT_VERSION,
        }),
    )
}
