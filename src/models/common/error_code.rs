use crate::errors::MarkingError;

/// API 响应中的业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    ValidationFailed = 1006,

    // 评分流程错误
    InvalidTransition = 3000,
    ResultNotReady = 3001,
    MarkOutOfRange = 3002,
    RemarkNotAllowed = 3003,
    RemarkCannotCancel = 3004,
    ExternalServiceFailed = 3005,
}

impl From<&MarkingError> for ErrorCode {
    fn from(err: &MarkingError) -> Self {
        match err {
            MarkingError::InvalidTransition(_) => ErrorCode::InvalidTransition,
            MarkingError::NotReady(_) => ErrorCode::ResultNotReady,
            MarkingError::OutOfRange(_) => ErrorCode::MarkOutOfRange,
            MarkingError::RemarkNotAllowed(_) => ErrorCode::RemarkNotAllowed,
            MarkingError::CannotCancel(_) => ErrorCode::RemarkCannotCancel,
            MarkingError::ExternalCollaborator(_) => ErrorCode::ExternalServiceFailed,
            MarkingError::NotFound(_) => ErrorCode::NotFound,
            MarkingError::Validation(_) => ErrorCode::ValidationFailed,
            MarkingError::Serialization(_) => ErrorCode::BadRequest,
            MarkingError::DatabaseConfig(_)
            | MarkingError::DatabaseConnection(_)
            | MarkingError::DatabaseOperation(_)
            | MarkingError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}
