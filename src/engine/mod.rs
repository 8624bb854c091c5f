//! 批改引擎
//!
//! 对外暴露的操作入口。纯核心（`grading`）负责决策，存储层负责在行锁事务内
//! 执行决策并重算总分，协作者负责仓库、宽限额度与截止时间。

mod annotations;
mod grace;
mod navigation;
mod remarks;
mod results;
mod submissions;
mod tags;
mod view;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::collaborators::{DeadlinePolicy, GraceCreditService, RepositoryAccess};
use crate::errors::{MarkingError, Result};
use crate::grading::{GraderScope, RemarkWorkflow, stats};
use crate::models::graders::entities::Grader;
use crate::models::results::entities::ResultSnapshot;
use crate::models::submissions::entities::{Assignment, Grouping, SubmissionContext};
use crate::storage::Storage;

const DEFAULT_DISTRIBUTION_INTERVALS: usize = 10;

#[derive(Clone)]
pub struct GradingEngine {
    storage: Arc<dyn Storage>,
    repository: Arc<dyn RepositoryAccess>,
    grace_credits: Arc<dyn GraceCreditService>,
    deadlines: Arc<dyn DeadlinePolicy>,
    distribution_intervals: usize,
}

impl GradingEngine {
    pub fn new(
        storage: Arc<dyn Storage>,
        repository: Arc<dyn RepositoryAccess>,
        grace_credits: Arc<dyn GraceCreditService>,
        deadlines: Arc<dyn DeadlinePolicy>,
    ) -> Self {
        Self {
            storage,
            repository,
            grace_credits,
            deadlines,
            distribution_intervals: DEFAULT_DISTRIBUTION_INTERVALS,
        }
    }

    /// 成绩分布的默认区间数
    pub fn with_distribution_intervals(mut self, intervals: usize) -> Self {
        if (1..=stats::MAX_INTERVALS).contains(&intervals) {
            self.distribution_intervals = intervals;
        }
        self
    }

    async fn assignment(&self, assignment_id: i64) -> Result<Assignment> {
        self.storage
            .get_assignment(assignment_id)
            .await?
            .ok_or_else(|| MarkingError::not_found(format!("Assignment {assignment_id} not found")))
    }

    async fn grouping(&self, grouping_id: i64) -> Result<Grouping> {
        self.storage
            .get_grouping(grouping_id)
            .await?
            .ok_or_else(|| MarkingError::not_found(format!("Grouping {grouping_id} not found")))
    }

    async fn grader(&self, grader_id: i64) -> Result<Grader> {
        self.storage
            .get_grader(grader_id)
            .await?
            .ok_or_else(|| MarkingError::not_found(format!("Grader {grader_id} not found")))
    }

    async fn snapshot(&self, result_id: i64) -> Result<ResultSnapshot> {
        self.storage
            .load_result_snapshot(result_id)
            .await?
            .ok_or_else(|| MarkingError::not_found(format!("Result {result_id} not found")))
    }

    async fn submission_context(&self, submission_id: i64) -> Result<SubmissionContext> {
        self.storage
            .load_submission_context(submission_id)
            .await?
            .ok_or_else(|| {
                MarkingError::not_found(format!("Submission {submission_id} not found"))
            })
    }

    /// 未指定阅卷人时返回 `None`，表示不限范围
    async fn grader_scope(
        &self,
        grader_id: Option<i64>,
        assignment_id: i64,
    ) -> Result<Option<GraderScope>> {
        let Some(grader_id) = grader_id else {
            return Ok(None);
        };
        self.grader(grader_id).await?;
        let assignment = self
            .storage
            .load_grader_assignment(grader_id, assignment_id)
            .await?;
        Ok(Some(GraderScope::new(&assignment)))
    }

    /// 作业中当前结果已完成的小组数；给出阅卷人时只统计其负责的小组
    async fn num_marked(&self, assignment_id: i64, scope: Option<&GraderScope>) -> Result<usize> {
        let overviews = self.storage.list_grouping_overviews(assignment_id).await?;
        Ok(overviews
            .iter()
            .filter(|o| scope.is_none_or(|s| s.covers_grouping(o.grouping.id)))
            .filter(|o| RemarkWorkflow::current_result(&o.results).is_some_and(|r| r.is_complete()))
            .count())
    }
}
