use std::sync::Arc;

use crate::collaborators::Revision;
use crate::errors::Result;
use crate::models::{
    annotations::entities::AnnotationCategory,
    criteria::entities::Criterion,
    grace::entities::GracePeriodDeduction,
    graders::entities::{Grader, GraderAssignment},
    results::{
        entities::{GradingResult, ResultSnapshot},
        mutations::{
            ResultMutation, ResultMutationOutcome, SubmissionMutation, SubmissionMutationOutcome,
        },
    },
    submissions::entities::{
        Assignment, Grouping, GroupingOverview, Membership, Student, Submission, SubmissionContext,
    },
    tags::entities::Tag,
};

pub mod sea_orm_storage;

/// 在结果行锁内根据快照决定变更
pub type ResultMutator = Box<dyn FnOnce(&ResultSnapshot) -> Result<ResultMutation> + Send>;

/// 在提交行锁内根据提交上下文决定变更
pub type SubmissionMutator =
    Box<dyn FnOnce(&SubmissionContext) -> Result<SubmissionMutation> + Send>;

pub fn result_mutator<F>(f: F) -> ResultMutator
where
    F: FnOnce(&ResultSnapshot) -> Result<ResultMutation> + Send + 'static,
{
    Box::new(f)
}

pub fn submission_mutator<F>(f: F) -> SubmissionMutator
where
    F: FnOnce(&SubmissionContext) -> Result<SubmissionMutation> + Send + 'static,
{
    Box::new(f)
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业与小组
    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn get_grouping(&self, grouping_id: i64) -> Result<Option<Grouping>>;
    async fn list_criteria(&self, assignment_id: i64) -> Result<Vec<Criterion>>;
    // 列出作业下每个小组的当前提交、结果、标签与宽限扣除
    async fn list_grouping_overviews(&self, assignment_id: i64) -> Result<Vec<GroupingOverview>>;

    /// 阅卷人
    async fn get_grader(&self, grader_id: i64) -> Result<Option<Grader>>;
    // 阅卷人在该作业中负责的小组与评分标准
    async fn load_grader_assignment(
        &self,
        grader_id: i64,
        assignment_id: i64,
    ) -> Result<GraderAssignment>;

    /// 学生与成员
    async fn get_student(&self, student_id: i64) -> Result<Option<Student>>;
    async fn get_membership(&self, membership_id: i64) -> Result<Option<Membership>>;

    /// 提交与结果
    async fn get_submission(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn get_result(&self, result_id: i64) -> Result<Option<GradingResult>>;
    async fn load_result_snapshot(&self, result_id: i64) -> Result<Option<ResultSnapshot>>;
    async fn load_submission_context(
        &self,
        submission_id: i64,
    ) -> Result<Option<SubmissionContext>>;
    // 收取一个新版本：旧版本标记为未使用，新建空白结果
    async fn create_collected_submission(
        &self,
        grouping_id: i64,
        revision: Revision,
    ) -> Result<(Submission, GradingResult)>;

    /// 事务性变更：加锁、决策、执行、重算总分、提交
    async fn mutate_result(
        &self,
        result_id: i64,
        mutator: ResultMutator,
    ) -> Result<ResultMutationOutcome>;
    async fn mutate_submission(
        &self,
        submission_id: i64,
        mutator: SubmissionMutator,
    ) -> Result<SubmissionMutationOutcome>;

    // 附加分 / 批注所属的结果
    async fn find_extra_mark_result(&self, extra_mark_id: i64) -> Result<Option<i64>>;
    async fn find_annotation_result(&self, annotation_id: i64) -> Result<Option<i64>>;

    /// 批注分类
    async fn list_annotation_categories(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<AnnotationCategory>>;

    /// 宽限期扣除
    async fn list_grace_deductions(&self, grouping_id: i64) -> Result<Vec<GracePeriodDeduction>>;
    async fn grace_units_used_by_student(&self, student_id: i64) -> Result<i64>;
    /// 与余额复核在同一事务中写入，余额不足时返回 `Validation`
    async fn create_grace_deduction(
        &self,
        membership_id: i64,
        deduction: i32,
    ) -> Result<GracePeriodDeduction>;
    async fn delete_grace_deduction(&self, deduction_id: i64) -> Result<bool>;

    /// 标签
    async fn create_tag(&self, name: &str, description: Option<String>) -> Result<Tag>;
    async fn get_tag(&self, tag_id: i64) -> Result<Option<Tag>>;
    async fn list_tags(&self) -> Result<Vec<Tag>>;
    // 已存在时返回 false
    async fn add_grouping_tag(&self, grouping_id: i64, tag_id: i64) -> Result<bool>;
    // 不存在时返回 false
    async fn remove_grouping_tag(&self, grouping_id: i64, tag_id: i64) -> Result<bool>;
    async fn list_grouping_tags(&self, grouping_id: i64) -> Result<Vec<Tag>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
