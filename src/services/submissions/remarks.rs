use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::results::requests::RemarkRequest;
use crate::services::respond;

pub async fn current_result(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(engine.current_result(submission_id).await, "Result loaded")
}

pub async fn request_remark(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    req: RemarkRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    // 空白的申请说明视为未填写
    let text = req.text.filter(|t| !t.trim().is_empty());
    respond(
        engine.request_remark(submission_id, text).await,
        "Remark requested",
    )
}

pub async fn cancel_remark(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine.cancel_remark(submission_id).await,
        "Remark cancelled",
    )
}
