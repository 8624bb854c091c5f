use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ResultService;
use crate::models::results::requests::{
    AddExtraMarkRequest, OverallCommentRequest, UpdateMarkRequest,
};
use crate::services::respond;

pub async fn update_mark(
    service: &ResultService,
    request: &HttpRequest,
    result_id: i64,
    req: UpdateMarkRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    let outcome = engine
        .apply_mark(result_id, &req.markable_key, req.mark, req.grader_id)
        .await;
    if outcome.is_ok() {
        info!("Mark {} updated on result {}", req.markable_key, result_id);
    }
    respond(outcome, "Mark updated")
}

pub async fn add_extra_mark(
    service: &ResultService,
    request: &HttpRequest,
    result_id: i64,
    req: AddExtraMarkRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine
            .add_extra_mark(result_id, req.extra_mark, req.unit, req.description)
            .await,
        "Extra mark added",
    )
}

pub async fn remove_extra_mark(
    service: &ResultService,
    request: &HttpRequest,
    extra_mark_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine.remove_extra_mark(extra_mark_id).await,
        "Extra mark removed",
    )
}

pub async fn update_overall_comment(
    service: &ResultService,
    request: &HttpRequest,
    result_id: i64,
    req: OverallCommentRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine
            .update_overall_comment(result_id, req.overall_comment)
            .await,
        "Overall comment updated",
    )
}
