//! Attribute HTTP Routes
//!
//! Manager-only writes; reads for any identified caller.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeDefinition, AttributeId, AttributePatch};
use crate::audit::AuditService;

use super::errors::{context_from_headers, ApiResult};

// ==================
// Request/Response Types
// ==================

/// Paging for list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

#[derive(Debug, Serialize)]
pub struct AttributesListResponse {
    pub attributes: Vec<Attribute>,
    pub total: usize,
}

// ==================
// Attribute Routes
// ==================

pub fn attribute_routes(state: Arc<AuditService>) -> Router {
    Router::new()
        .route(
            "/attributes",
            get(list_attributes_handler).post(create_attribute_handler),
        )
        .route(
            "/attributes/:id",
            get(get_attribute_handler)
                .put(update_attribute_handler)
                .delete(delete_attribute_handler),
        )
        .with_state(state)
}

async fn list_attributes_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<AttributesListResponse>> {
    context_from_headers(&headers)?;
    let Query(page) = page?;
    let attributes = state.list_attributes(page.offset, page.limit)?;
    Ok(Json(AttributesListResponse {
        total: attributes.len(),
        attributes,
    }))
}

async fn get_attribute_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    Path(id): Path<AttributeId>,
) -> ApiResult<Json<Attribute>> {
    context_from_headers(&headers)?;
    Ok(Json(state.get_attribute(id)?))
}

async fn create_attribute_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    body: Result<Json<AttributeDefinition>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Attribute>)> {
    let ctx = context_from_headers(&headers)?;
    let Json(definition) = body?;
    let attribute = state.create_attribute(&ctx, &definition)?;
    Ok((StatusCode::CREATED, Json(attribute)))
}

async fn update_attribute_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    Path(id): Path<AttributeId>,
    body: Result<Json<AttributePatch>, JsonRejection>,
) -> ApiResult<Json<Attribute>> {
    let ctx = context_from_headers(&headers)?;
    let Json(patch) = body?;
    Ok(Json(state.update_attribute(&ctx, id, patch)?))
}

async fn delete_attribute_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    Path(id): Path<AttributeId>,
) -> ApiResult<StatusCode> {
    let ctx = context_from_headers(&headers)?;
    state.delete_attribute(&ctx, id)?;
    Ok(StatusCode::NO_CONTENT)
}
