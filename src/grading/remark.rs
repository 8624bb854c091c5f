//! 复评流程
//!
//! 当前结果不单独存储，而是每次由提交下的结果序列推导：
//! 已完成的复评结果中 `remark_request_timestamp` 最新者优先，否则为原始结果。

use tracing::debug;

use crate::errors::{MarkingError, Result};
use crate::models::results::entities::{GradingResult, ResultStatus};
use crate::models::results::mutations::SubmissionMutation;
use crate::models::submissions::entities::SubmissionContext;

pub struct RemarkWorkflow;

impl RemarkWorkflow {
    /// 原始批改（最早创建的非复评结果）
    pub fn original_result(results: &[GradingResult]) -> Option<&GradingResult> {
        results
            .iter()
            .filter(|r| !r.is_remark)
            .min_by_key(|r| r.id)
            .or_else(|| results.iter().min_by_key(|r| r.id))
    }

    /// 最近一次复评结果
    pub fn latest_remark(results: &[GradingResult]) -> Option<&GradingResult> {
        results
            .iter()
            .filter(|r| r.is_remark)
            .max_by_key(|r| (r.remark_request_timestamp, r.id))
    }

    /// 尚未完成的复评结果
    pub fn pending_remark(results: &[GradingResult]) -> Option<&GradingResult> {
        Self::latest_remark(results).filter(|r| !r.is_complete())
    }

    pub fn current_result(results: &[GradingResult]) -> Option<&GradingResult> {
        results
            .iter()
            .filter(|r| r.is_remark && r.is_complete())
            .max_by_key(|r| (r.remark_request_timestamp, r.id))
            .or_else(|| Self::original_result(results))
    }

    /// 批改人正在处理的结果：有未完成复评时为复评结果
    pub fn working_result(results: &[GradingResult]) -> Option<&GradingResult> {
        Self::pending_remark(results).or_else(|| Self::current_result(results))
    }

    pub fn submission_status(results: &[GradingResult]) -> ResultStatus {
        if Self::pending_remark(results).is_some() {
            return ResultStatus::RemarkRequested;
        }
        match Self::current_result(results) {
            None => ResultStatus::NotCollected,
            Some(r) if r.released_to_students => ResultStatus::Released,
            Some(r) if r.is_complete() => ResultStatus::Complete,
            Some(_) => ResultStatus::InProgress,
        }
    }

    /// 计入成绩统计的结果；复评进行中时不计入
    pub fn counted_result(results: &[GradingResult]) -> Option<&GradingResult> {
        if Self::pending_remark(results).is_some() {
            return None;
        }
        Self::current_result(results).filter(|r| r.is_complete())
    }

    pub fn plan_request(
        ctx: &SubmissionContext,
        deadline_passed: bool,
        requested_at: chrono::DateTime<chrono::Utc>,
        text: Option<String>,
    ) -> Result<SubmissionMutation> {
        let submission_id = ctx.submission.id;
        if !ctx.assignment.allow_remarks {
            return Err(MarkingError::remark_not_allowed(format!(
                "Assignment {} does not accept remark requests",
                ctx.assignment.short_identifier
            )));
        }
        if Self::pending_remark(&ctx.results).is_some() {
            return Err(MarkingError::remark_not_allowed(format!(
                "Submission {submission_id} already has a pending remark request"
            )));
        }
        let released = Self::current_result(&ctx.results).is_some_and(|r| r.released_to_students);
        if !released {
            return Err(MarkingError::remark_not_allowed(format!(
                "Submission {submission_id} has no released result"
            )));
        }
        if deadline_passed {
            return Err(MarkingError::remark_not_allowed(format!(
                "Remark deadline for {} has passed",
                ctx.assignment.short_identifier
            )));
        }

        debug!("Remark request accepted for submission {}", submission_id);
        Ok(SubmissionMutation::CreateRemark {
            requested_at,
            text: text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        })
    }

    pub fn plan_cancel(ctx: &SubmissionContext) -> Result<SubmissionMutation> {
        let remark = Self::latest_remark(&ctx.results).ok_or_else(|| {
            MarkingError::not_found(format!(
                "Submission {} has no remark request",
                ctx.submission.id
            ))
        })?;
        if remark.is_complete() {
            return Err(MarkingError::cannot_cancel(format!(
                "Remark result {} has already been completed",
                remark.id
            )));
        }
        Ok(SubmissionMutation::DeleteResult(remark.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::state::tests::result;
    use crate::models::results::entities::MarkingState;
    use crate::models::submissions::entities::{Assignment, Grouping, Submission};
    use chrono::{Duration, Utc};

    fn original(released: bool) -> GradingResult {
        let mut r = result(MarkingState::Complete, released);
        r.id = 10;
        r
    }

    fn remark(id: i64, state: MarkingState, minutes_ago: i64) -> GradingResult {
        let mut r = result(state, false);
        r.id = id;
        r.is_remark = true;
        r.remark_request_timestamp = Some(Utc::now() - Duration::minutes(minutes_ago));
        r
    }

    fn context(results: Vec<GradingResult>, allow_remarks: bool) -> SubmissionContext {
        let now = Utc::now();
        SubmissionContext {
            submission: Submission {
                id: 3,
                grouping_id: 4,
                revision_identifier: "abc123".to_string(),
                revision_timestamp: Some(now),
                submission_version: 1,
                version_used: true,
                created_at: now,
            },
            grouping: Grouping {
                id: 4,
                assignment_id: 1,
                group_name: "group_0004".to_string(),
                repo_name: "group_0004".to_string(),
                created_at: now,
            },
            assignment: Assignment {
                id: 1,
                short_identifier: "A1".to_string(),
                description: None,
                allow_remarks,
                remark_due_date: None,
                anonymize_groups: false,
            assign_graders_to_criteria: false,
            hide_unassigned_criteria: false,
                created_at: now,
                updated_at: now,
            },
            results,
        }
    }

    #[test]
    fn test_current_result_is_original_while_remark_pending() {
        let results = vec![original(true), remark(11, MarkingState::Incomplete, 5)];
        assert_eq!(RemarkWorkflow::current_result(&results).map(|r| r.id), Some(10));
        assert_eq!(RemarkWorkflow::working_result(&results).map(|r| r.id), Some(11));
        assert_eq!(
            RemarkWorkflow::submission_status(&results),
            ResultStatus::RemarkRequested
        );
        assert!(RemarkWorkflow::counted_result(&results).is_none());
    }

    #[test]
    fn test_completed_remark_supersedes_original() {
        let results = vec![
            original(true),
            remark(11, MarkingState::Complete, 60),
            remark(12, MarkingState::Complete, 5),
        ];
        assert_eq!(RemarkWorkflow::current_result(&results).map(|r| r.id), Some(12));
        assert_eq!(RemarkWorkflow::original_result(&results).map(|r| r.id), Some(10));
        assert_eq!(RemarkWorkflow::submission_status(&results), ResultStatus::Complete);
        assert_eq!(RemarkWorkflow::counted_result(&results).map(|r| r.id), Some(12));
    }

    #[test]
    fn test_status_without_results_is_not_collected() {
        assert_eq!(RemarkWorkflow::submission_status(&[]), ResultStatus::NotCollected);
    }

    #[test]
    fn test_request_remark_requires_released_result() {
        let ctx = context(vec![original(false)], true);
        assert!(matches!(
            RemarkWorkflow::plan_request(&ctx, false, Utc::now(), None),
            Err(MarkingError::RemarkNotAllowed(_))
        ));
    }

    #[test]
    fn test_request_remark_rejections() {
        let ctx = context(vec![original(true)], false);
        assert!(matches!(
            RemarkWorkflow::plan_request(&ctx, false, Utc::now(), None),
            Err(MarkingError::RemarkNotAllowed(_))
        ));

        let ctx = context(vec![original(true)], true);
        assert!(matches!(
            RemarkWorkflow::plan_request(&ctx, true, Utc::now(), None),
            Err(MarkingError::RemarkNotAllowed(_))
        ));

        let ctx = context(
            vec![original(true), remark(11, MarkingState::Incomplete, 1)],
            true,
        );
        assert!(matches!(
            RemarkWorkflow::plan_request(&ctx, false, Utc::now(), None),
            Err(MarkingError::RemarkNotAllowed(_))
        ));
    }

    #[test]
    fn test_request_remark_creates_blank_result() {
        let ctx = context(vec![original(true)], true);
        let now = Utc::now();
        let planned =
            RemarkWorkflow::plan_request(&ctx, false, now, Some("  Please re-check Q2 ".into()))
                .unwrap();
        assert_eq!(
            planned,
            SubmissionMutation::CreateRemark {
                requested_at: now,
                text: Some("Please re-check Q2".to_string()),
            }
        );
    }

    #[test]
    fn test_cancel_remark() {
        let ctx = context(vec![original(true)], true);
        assert!(matches!(
            RemarkWorkflow::plan_cancel(&ctx),
            Err(MarkingError::NotFound(_))
        ));

        let ctx = context(
            vec![original(true), remark(11, MarkingState::Incomplete, 1)],
            true,
        );
        assert_eq!(
            RemarkWorkflow::plan_cancel(&ctx).unwrap(),
            SubmissionMutation::DeleteResult(11)
        );

        let ctx = context(
            vec![original(true), remark(11, MarkingState::Complete, 1)],
            true,
        );
        assert!(matches!(
            RemarkWorkflow::plan_cancel(&ctx),
            Err(MarkingError::CannotCancel(_))
        ));
    }
}
