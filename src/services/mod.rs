pub mod groupings;
pub mod results;
pub mod submissions;

pub use groupings::GroupingService;
pub use results::ResultService;
pub use submissions::SubmissionService;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};
use ts_rs::TS;

use crate::engine::GradingEngine;
use crate::errors::{MarkingError, Result};
use crate::models::ApiResponse;

/// 从应用数据中取出批改引擎
pub(crate) fn engine_from(
    engine: &Option<Arc<GradingEngine>>,
    request: &HttpRequest,
) -> ActixResult<Arc<GradingEngine>> {
    if let Some(engine) = engine {
        return Ok(engine.clone());
    }
    request
        .app_data::<web::Data<GradingEngine>>()
        .map(|data| data.clone().into_inner())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Grading engine not configured"))
}

/// 错误类型到 HTTP 状态码的映射
pub(crate) fn status_for(err: &MarkingError) -> StatusCode {
    match err {
        MarkingError::NotFound(_) => StatusCode::NOT_FOUND,
        MarkingError::Validation(_)
        | MarkingError::OutOfRange(_)
        | MarkingError::Serialization(_) => StatusCode::BAD_REQUEST,
        MarkingError::InvalidTransition(_)
        | MarkingError::NotReady(_)
        | MarkingError::RemarkNotAllowed(_)
        | MarkingError::CannotCancel(_) => StatusCode::CONFLICT,
        MarkingError::ExternalCollaborator(_) => StatusCode::BAD_GATEWAY,
        MarkingError::DatabaseConfig(_)
        | MarkingError::DatabaseConnection(_)
        | MarkingError::DatabaseOperation(_)
        | MarkingError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(err: &MarkingError) -> HttpResponse {
    if err.is_domain_error() {
        debug!("Request rejected: {}", err);
    } else {
        error!("{:?}", err);
    }
    HttpResponse::build(status_for(err)).json(ApiResponse::from_error(err))
}

/// 成功时包装为统一响应，失败时按错误类型返回
pub(crate) fn respond<T>(result: Result<T>, message: &str) -> ActixResult<HttpResponse>
where
    T: Serialize + TS,
{
    Ok(match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data, message)),
        Err(e) => error_response(&e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&MarkingError::not_found("x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&MarkingError::out_of_range("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&MarkingError::not_ready("x")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&MarkingError::external_collaborator("x")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&MarkingError::database_operation("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_respond_wraps_errors() {
        let ok = respond(Ok(3_i32), "done").unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let err = respond::<i32>(Err(MarkingError::cannot_cancel("x")), "done").unwrap();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
