//! 外部协作者
//!
//! 批改核心通过这些窄接口访问代码仓库、宽限额度与截止时间策略。
//! 协作者的任何失败都以 `ExternalCollaborator` 错误返回，不影响本地状态。

pub mod deadline;
pub mod grace;
pub mod repository;

pub use deadline::{AssignmentDeadlinePolicy, DeadlinePolicy};
pub use grace::{GraceCreditService, StorageGraceCredits};
pub use repository::{ExportFile, FsRepository, RepositoryAccess, Revision};

use crate::errors::MarkingError;

/// 将协作者内部错误统一包装
pub(crate) fn external(context: &str, err: impl std::fmt::Display) -> MarkingError {
    MarkingError::external_collaborator(format!("{context}: {err}"))
}

/// 协作者错误、输入校验与资源不存在保持原样，其余一律包装
pub(crate) fn collaborator_error(context: &str, err: MarkingError) -> MarkingError {
    match err {
        MarkingError::ExternalCollaborator(_)
        | MarkingError::Validation(_)
        | MarkingError::NotFound(_) => err,
        other => external(context, other),
    }
}
