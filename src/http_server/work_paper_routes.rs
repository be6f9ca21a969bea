//! Work Paper HTTP Routes
//!
//! Submission, lookup and the audit trigger.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::audit::AuditService;
use crate::conclusion::Conclusion;
use crate::workpaper::{WorkPaper, WorkPaperId, WorkPaperSubmission};

use super::attribute_routes::PageQuery;
use super::errors::{context_from_headers, ApiResult};

#[derive(Debug, Serialize)]
pub struct WorkPapersListResponse {
    pub work_papers: Vec<WorkPaper>,
    pub total: usize,
}

pub fn work_paper_routes(state: Arc<AuditService>) -> Router {
    Router::new()
        .route(
            "/work-papers",
            get(list_work_papers_handler).post(submit_work_paper_handler),
        )
        .route("/work-papers/:id", get(get_work_paper_handler))
        .route("/work-papers/:id/audit", post(run_audit_handler))
        .with_state(state)
}

async fn list_work_papers_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<WorkPapersListResponse>> {
    context_from_headers(&headers)?;
    let Query(page) = page?;
    let work_papers = state.list_work_papers(page.offset, page.limit)?;
    Ok(Json(WorkPapersListResponse {
        total: work_papers.len(),
        work_papers,
    }))
}

async fn get_work_paper_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    Path(id): Path<WorkPaperId>,
) -> ApiResult<Json<WorkPaper>> {
    context_from_headers(&headers)?;
    Ok(Json(state.get_work_paper(id)?))
}

async fn submit_work_paper_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    body: Result<Json<WorkPaperSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WorkPaper>)> {
    let ctx = context_from_headers(&headers)?;
    let Json(submission) = body?;
    let work_paper = state.submit_work_paper(&ctx, submission)?;
    Ok((StatusCode::CREATED, Json(work_paper)))
}

/// "Run audit for work paper X"
async fn run_audit_handler(
    State(state): State<Arc<AuditService>>,
    headers: HeaderMap,
    Path(id): Path<WorkPaperId>,
) -> ApiResult<Json<Conclusion>> {
    let ctx = context_from_headers(&headers)?;
    Ok(Json(state.run_audit(&ctx, id)?))
}
