//! 结果状态与分数操作

use futures_util::future::join_all;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::GradingEngine;
use crate::errors::{MarkingError, Result};
use crate::grading::{BatchItem, BatchOutcome, RemarkWorkflow, ResultStateMachine};
use crate::models::criteria::entities::MarkableKey;
use crate::models::results::{
    entities::{ExtraMark, ExtraMarkUnit, GradingResult, MarkTotals, TransitionAction},
    mutations::{AppliedChange, ResultMutation},
    responses::MarkUpdateResponse,
};
use crate::storage::result_mutator;

impl GradingEngine {
    /// 提交的当前结果：最新完成的复评，否则为原始结果
    pub async fn current_result(&self, submission_id: i64) -> Result<GradingResult> {
        let ctx = self.submission_context(submission_id).await?;
        RemarkWorkflow::current_result(&ctx.results)
            .cloned()
            .ok_or_else(|| {
                MarkingError::not_found(format!("Submission {submission_id} has no result"))
            })
    }

    pub async fn recompute_total(&self, result_id: i64) -> Result<MarkTotals> {
        let outcome = self
            .storage
            .mutate_result(result_id, result_mutator(|_| Ok(ResultMutation::None)))
            .await?;
        Ok(outcome.totals)
    }

    pub async fn transition(
        &self,
        result_id: i64,
        action: TransitionAction,
    ) -> Result<GradingResult> {
        match action {
            TransitionAction::RequestRemark | TransitionAction::CancelRemark => {
                let result = self.storage.get_result(result_id).await?.ok_or_else(|| {
                    MarkingError::not_found(format!("Result {result_id} not found"))
                })?;
                if action == TransitionAction::RequestRemark {
                    self.request_remark(result.submission_id, None).await
                } else {
                    self.cancel_remark(result.submission_id).await
                }
            }
            _ => {
                let outcome = self
                    .storage
                    .mutate_result(
                        result_id,
                        result_mutator(move |snapshot| ResultStateMachine::plan(snapshot, action)),
                    )
                    .await?;
                info!(
                    "Result {} {} -> {:?}",
                    result_id,
                    action,
                    ResultStateMachine::status(&outcome.snapshot.result)
                );
                Ok(outcome.snapshot.result)
            }
        }
    }

    /// 在未完成与完成之间切换
    pub async fn toggle_marking_state(&self, result_id: i64) -> Result<GradingResult> {
        let outcome = self
            .storage
            .mutate_result(result_id, result_mutator(ResultStateMachine::plan_toggle))
            .await?;
        Ok(outcome.snapshot.result)
    }

    /// 批量发布或撤回，逐项独立执行
    pub async fn release(
        &self,
        result_ids: &[i64],
        released: bool,
    ) -> BatchOutcome<GradingResult> {
        let action = if released {
            TransitionAction::Release
        } else {
            TransitionAction::Unrelease
        };
        let items = join_all(result_ids.iter().map(|&id| async move {
            let outcome = self.transition(id, action).await;
            if let Err(e) = &outcome {
                warn!("{} of result {} failed: {}", action, id, e);
            }
            BatchItem::from_result(id, outcome)
        }))
        .await;
        BatchOutcome::new(items)
    }

    pub async fn apply_mark(
        &self,
        result_id: i64,
        markable_key: &str,
        value: serde_json::Value,
        grader_id: Option<i64>,
    ) -> Result<MarkUpdateResponse> {
        let key = MarkableKey::parse(markable_key)?;
        // 未知阅卷人在写入前拒绝
        if let Some(grader_id) = grader_id {
            self.grader(grader_id).await?;
        }
        let outcome = self
            .storage
            .mutate_result(
                result_id,
                result_mutator(move |snapshot| ResultStateMachine::plan_mark(snapshot, key, &value)),
            )
            .await?;

        let AppliedChange::Mark(mark_id) = outcome.change else {
            return Err(MarkingError::database_operation(format!(
                "Mark update on result {result_id} did not persist"
            )));
        };
        let mark = outcome
            .snapshot
            .marks
            .iter()
            .find(|m| m.id == mark_id)
            .cloned()
            .ok_or_else(|| MarkingError::not_found(format!("Mark {mark_id} not found")))?;
        let scope = self
            .grader_scope(grader_id, outcome.snapshot.assignment_id)
            .await?;
        let num_marked = self
            .num_marked(outcome.snapshot.assignment_id, scope.as_ref())
            .await?;

        Ok(MarkUpdateResponse {
            mark,
            total_mark: outcome.totals.total_mark,
            total_possible: outcome.totals.total_possible,
            num_marked,
        })
    }

    pub async fn add_extra_mark(
        &self,
        result_id: i64,
        extra_mark: Decimal,
        unit: ExtraMarkUnit,
        description: Option<String>,
    ) -> Result<ExtraMark> {
        let outcome = self
            .storage
            .mutate_result(
                result_id,
                result_mutator(move |snapshot| {
                    ResultStateMachine::plan_add_extra_mark(snapshot, extra_mark, unit, description)
                }),
            )
            .await?;

        match outcome.change {
            AppliedChange::ExtraMark(id) => outcome
                .snapshot
                .extra_mark(id)
                .cloned()
                .ok_or_else(|| MarkingError::not_found(format!("Extra mark {id} not found"))),
            _ => Err(MarkingError::database_operation(format!(
                "Extra mark on result {result_id} did not persist"
            ))),
        }
    }

    pub async fn remove_extra_mark(&self, extra_mark_id: i64) -> Result<MarkTotals> {
        let result_id = self
            .storage
            .find_extra_mark_result(extra_mark_id)
            .await?
            .ok_or_else(|| {
                MarkingError::not_found(format!("Extra mark {extra_mark_id} not found"))
            })?;
        let outcome = self
            .storage
            .mutate_result(
                result_id,
                result_mutator(move |snapshot| {
                    ResultStateMachine::plan_remove_extra_mark(snapshot, extra_mark_id)
                }),
            )
            .await?;
        Ok(outcome.totals)
    }

    pub async fn update_overall_comment(
        &self,
        result_id: i64,
        overall_comment: Option<String>,
    ) -> Result<GradingResult> {
        let outcome = self
            .storage
            .mutate_result(
                result_id,
                result_mutator(move |snapshot| {
                    ResultStateMachine::plan_overall_comment(snapshot, overall_comment)
                }),
            )
            .await?;
        Ok(outcome.snapshot.result)
    }
}
