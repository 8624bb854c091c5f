use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupingService;
use crate::models::ApiResponse;
use crate::models::grace::requests::AddGraceDeductionRequest;
use crate::services::{error_response, respond};

pub async fn list_grace_deductions(
    service: &GroupingService,
    request: &HttpRequest,
    grouping_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine.grace_period_deductions(grouping_id).await,
        "Grace deductions loaded",
    )
}

pub async fn add_grace_deduction(
    service: &GroupingService,
    request: &HttpRequest,
    req: AddGraceDeductionRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    match engine
        .add_grace_period_deduction(req.membership_id, req.deduction)
        .await
    {
        Ok(created) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(created, "Grace deduction recorded"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_grace_deduction(
    service: &GroupingService,
    request: &HttpRequest,
    grouping_id: i64,
    deduction_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    match engine
        .delete_grace_period_deduction(grouping_id, deduction_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Grace deduction removed"))),
        Err(e) => Ok(error_response(&e)),
    }
}
