//! Conclusion HTTP Routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::audit::AuditService;
use crate::conclusion::Conclusion;
use crate::workpaper::WorkPaperId;

use super::errors::{context_from_headers, ApiResult};

pub fn conclusion_routes(state: Arc<AuditService>) -> Router {
    Router::new()
        .route("/conclusions/:id", get(get_conclusion_handler))
        .route(
            "/work-papers/:id/conclusion",
            get(work_paper_conclusion_handler),
        )
        .route(
            "/work-papers/:id/conclusion/export",
            get(export_findings_handler),
        )
        .with_state(state)
}

async fn get_conclusion_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Conclusion>> {
    context_from_headers(&headers)?;
    Ok(Json(state.get_conclusion(id)?))
}

async fn work_paper_conclusion_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    Path(id): Path<WorkPaperId>,
) -> ApiResult<Json<Conclusion>> {
    context_from_headers(&headers)?;
    Ok(Json(state.conclusion_for(id)?))
}

async fn export_findings_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    Path(id): Path<WorkPaperId>,
) -> ApiResult<impl IntoResponse> {
    context_from_headers(&headers)?;
    let csv = state.export_findings(id)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"work_paper_{}_findings.csv\"", id),
            ),
        ],
        csv,
    ))
}
