//! 结果视图

use std::collections::BTreeMap;

use super::GradingEngine;
use crate::errors::Result;
use crate::grading::{DeductionLedger, MarkAggregator, RemarkWorkflow, ResultStateMachine};
use crate::models::results::{
    entities::{ResultSnapshot, ResultStatus},
    responses::{MarkView, ResultView},
};

/// 以评分标准为单位展开分数，未评分的标准同样列出
fn mark_views(snapshot: &ResultSnapshot) -> BTreeMap<String, MarkView> {
    let ledger = DeductionLedger::from_annotations(&snapshot.annotations);
    snapshot
        .criteria
        .iter()
        .map(|criterion| {
            let mark = snapshot.mark_for(criterion.id);
            let view = MarkView {
                criterion_id: criterion.id,
                criterion_name: criterion.name.clone(),
                mark: mark.and_then(|m| m.mark),
                score: mark.and_then(|m| MarkAggregator::criterion_contribution(criterion, m, &ledger)),
                max_mark: criterion.kind.max_score(),
                deduction: ledger.deduction_for(criterion.id),
            };
            (criterion.markable_key().to_string(), view)
        })
        .collect()
}

impl GradingEngine {
    /// `grader_id` 给出且作业按阅卷人分配评分标准时，附带其负责的标准；
    /// 作业同时隐藏未分配标准时，`marks` 与 `old_marks` 只保留这些标准
    pub async fn view_result(&self, result_id: i64, grader_id: Option<i64>) -> Result<ResultView> {
        let snapshot = self.snapshot(result_id).await?;
        let ctx = self.submission_context(snapshot.result.submission_id).await?;

        let assigned_criteria = match self.grader_scope(grader_id, ctx.assignment.id).await? {
            Some(scope) if ctx.assignment.assign_graders_to_criteria => {
                Some(scope.assigned_keys(&snapshot.criteria))
            }
            _ => None,
        };
        let visible = |mut marks: BTreeMap<String, MarkView>| {
            if let Some(keys) = assigned_criteria
                .as_ref()
                .filter(|_| ctx.assignment.hide_unassigned_criteria)
            {
                marks.retain(|key, _| keys.contains(key));
            }
            marks
        };

        let is_pending_remark = RemarkWorkflow::pending_remark(&ctx.results)
            .is_some_and(|r| r.id == snapshot.result.id);
        let status = if is_pending_remark {
            ResultStatus::RemarkRequested
        } else {
            ResultStateMachine::status(&snapshot.result)
        };

        let old_marks = match RemarkWorkflow::original_result(&ctx.results) {
            Some(original) if snapshot.result.is_remark && original.id != snapshot.result.id => {
                Some(visible(mark_views(&self.snapshot(original.id).await?)))
            }
            _ => None,
        };

        let (group_name, grace_period_deductions) = if ctx.assignment.anonymize_groups {
            (format!("Group {}", ctx.grouping.id), Vec::new())
        } else {
            (
                ctx.grouping.group_name.clone(),
                self.storage.list_grace_deductions(ctx.grouping.id).await?,
            )
        };

        let annotation_categories = self
            .storage
            .list_annotation_categories(snapshot.assignment_id)
            .await?;
        let tags = self.storage.list_grouping_tags(ctx.grouping.id).await?;
        let totals = MarkAggregator::recompute_snapshot(&snapshot)?;
        let marks = visible(mark_views(&snapshot));

        Ok(ResultView {
            status,
            submission_id: ctx.submission.id,
            grouping_id: ctx.grouping.id,
            group_name,
            marks,
            old_marks,
            assigned_criteria,
            extra_marks: snapshot.extra_marks,
            totals,
            annotation_categories,
            annotations: snapshot.annotations,
            grace_period_deductions,
            tags,
            result: snapshot.result,
        })
    }
}
