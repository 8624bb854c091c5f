use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ResultService;
use crate::errors::MarkingError;
use crate::models::results::requests::{ReleaseRequest, TransitionRequest};
use crate::services::{error_response, respond};

pub async fn transition(
    service: &ResultService,
    request: &HttpRequest,
    result_id: i64,
    req: TransitionRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine.transition(result_id, req.action).await,
        "Transition applied",
    )
}

pub async fn toggle_marking_state(
    service: &ResultService,
    request: &HttpRequest,
    result_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine.toggle_marking_state(result_id).await,
        "Marking state toggled",
    )
}

/// 逐个结果处理，部分失败时仍返回 200，失败项在响应体中列出
pub async fn release(
    service: &ResultService,
    request: &HttpRequest,
    req: ReleaseRequest,
) -> ActixResult<HttpResponse> {
    if req.result_ids.is_empty() {
        return Ok(error_response(&MarkingError::validation(
            "No results selected",
        )));
    }
    let engine = service.get_engine(request)?;
    let outcome = engine.release(&req.result_ids, req.released).await;
    info!(
        "Release({}) applied to {}/{} results",
        req.released,
        outcome.succeeded,
        req.result_ids.len()
    );
    respond(Ok(outcome), "Release processed")
}
