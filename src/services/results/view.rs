use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ResultService;
use crate::models::results::requests::ResultViewQuery;
use crate::models::results::responses::TotalResponse;
use crate::services::respond;

pub async fn view_result(
    service: &ResultService,
    request: &HttpRequest,
    result_id: i64,
    query: ResultViewQuery,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine.view_result(result_id, query.grader_id).await,
        "Result loaded",
    )
}

pub async fn recompute_total(
    service: &ResultService,
    request: &HttpRequest,
    result_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    let totals = engine
        .recompute_total(result_id)
        .await
        .map(|totals| TotalResponse { result_id, totals });
    respond(totals, "Total recomputed")
}
