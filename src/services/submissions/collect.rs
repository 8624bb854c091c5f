use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::MarkingError;
use crate::models::submissions::requests::CollectRequest;
use crate::services::{error_response, respond};

pub async fn collect_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    req: CollectRequest,
) -> ActixResult<HttpResponse> {
    if req.grouping_ids.is_empty() {
        return Ok(error_response(&MarkingError::validation(
            "No groupings selected",
        )));
    }
    let engine = service.get_engine(request)?;
    respond(
        engine
            .collect_submissions(assignment_id, &req.grouping_ids, req.override_existing)
            .await,
        "Collection processed",
    )
}

pub async fn list_rows(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(engine.submission_rows(assignment_id).await, "Submissions loaded")
}

pub async fn annotation_categories(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine.annotation_categories(assignment_id).await,
        "Annotation categories loaded",
    )
}
