//! # HTTP Server Module
//!
//! axum surface over the audit service.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/attributes[/:id]` - Attribute definitions (writes need `manager`)
//! - `/api/work-papers[/:id]` - Work paper submission and lookup
//! - `/api/work-papers/:id/audit` - Run the audit, returns the conclusion
//! - `/api/work-papers/:id/conclusion[/export]` - Stored conclusion, findings CSV
//! - `/api/conclusions/:id` - Conclusion by id
//!
//! Every `/api` route requires the `x-user-id` and `x-user-role` headers.

pub mod attribute_routes;
pub mod conclusion_routes;
pub mod config;
pub mod errors;
pub mod server;
pub mod work_paper_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
