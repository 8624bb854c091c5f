use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ResultService;
use crate::models::annotations::requests::AddAnnotationRequest;
use crate::services::respond;

pub async fn add_annotation(
    service: &ResultService,
    request: &HttpRequest,
    result_id: i64,
    req: AddAnnotationRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine.add_annotation(result_id, req).await,
        "Annotation added",
    )
}

pub async fn remove_annotation(
    service: &ResultService,
    request: &HttpRequest,
    annotation_id: i64,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request)?;
    respond(
        engine.remove_annotation(annotation_id).await,
        "Annotation removed",
    )
}
