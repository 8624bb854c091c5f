use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupingService;
use crate::models::ApiResponse;
use crate::models::tags::requests::CreateTagRequest;
use crate::services::{error_response, respond};

pub async fn create_tag(
    service: &GroupingService,
    request: &HttpRequest,
    req: CreateTagRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    match engine.create_tag(&req.name, req.description).await {
        Ok(tag) => Ok(HttpResponse::Created().json(ApiResponse::success(tag, "Tag created"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_tags(
    service: &GroupingService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(engine.list_tags().await, "Tags loaded")
}

pub async fn grouping_tags(
    service: &GroupingService,
    request: &HttpRequest,
    grouping_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(engine.grouping_tags(grouping_id).await, "Tags loaded")
}

pub async fn add_tag(
    service: &GroupingService,
    request: &HttpRequest,
    grouping_id: i64,
    tag_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(engine.add_tag(grouping_id, tag_id).await, "Tag added")
}

pub async fn remove_tag(
    service: &GroupingService,
    request: &HttpRequest,
    grouping_id: i64,
    tag_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(engine.remove_tag(grouping_id, tag_id).await, "Tag removed")
}
