//! 复评请求与撤销

use tracing::info;

use super::GradingEngine;
use crate::collaborators::collaborator_error;
use crate::errors::{MarkingError, Result};
use crate::grading::RemarkWorkflow;
use crate::models::results::entities::GradingResult;
use crate::storage::submission_mutator;

impl GradingEngine {
    /// 为提交新建一个空白复评结果
    pub async fn request_remark(
        &self,
        submission_id: i64,
        text: Option<String>,
    ) -> Result<GradingResult> {
        // 截止时间由协作者判定，不能在事务内等待
        let ctx = self.submission_context(submission_id).await?;
        let deadline_passed = self
            .deadlines
            .remark_deadline_passed(&ctx.assignment)
            .await
            .map_err(|e| collaborator_error("Deadline lookup failed", e))?;
        let requested_at = chrono::Utc::now();

        let outcome = self
            .storage
            .mutate_submission(
                submission_id,
                submission_mutator(move |ctx| {
                    RemarkWorkflow::plan_request(ctx, deadline_passed, requested_at, text)
                }),
            )
            .await?;

        let remark = outcome.created.ok_or_else(|| {
            MarkingError::database_operation(format!(
                "Remark result for submission {submission_id} was not created"
            ))
        })?;
        info!(
            "Remark requested for submission {} (result {})",
            submission_id, remark.id
        );
        Ok(remark)
    }

    /// 删除尚未完成的复评结果，返回撤销后的当前结果
    pub async fn cancel_remark(&self, submission_id: i64) -> Result<GradingResult> {
        let outcome = self
            .storage
            .mutate_submission(submission_id, submission_mutator(RemarkWorkflow::plan_cancel))
            .await?;

        if let Some(deleted) = outcome.deleted {
            info!(
                "Remark result {} of submission {} cancelled",
                deleted, submission_id
            );
        }
        RemarkWorkflow::current_result(&outcome.context.results)
            .cloned()
            .ok_or_else(|| {
                MarkingError::not_found(format!("Submission {submission_id} has no result"))
            })
    }
}
