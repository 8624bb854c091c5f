use async_trait::async_trait;

use crate::errors::Result;
use crate::models::submissions::entities::Assignment;

#[async_trait]
pub trait DeadlinePolicy: Send + Sync {
    async fn remark_deadline_passed(&self, assignment: &Assignment) -> Result<bool>;
}

/// 以作业的 `remark_due_date` 为准；未设置时不限期
#[derive(Debug, Default, Clone)]
pub struct AssignmentDeadlinePolicy;

#[async_trait]
impl DeadlinePolicy for AssignmentDeadlinePolicy {
    async fn remark_deadline_passed(&self, assignment: &Assignment) -> Result<bool> {
        Ok(assignment
            .remark_due_date
            .is_some_and(|due| chrono::Utc::now() > due))
    }
}
