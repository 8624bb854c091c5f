use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;

use super::GradingEngine;
use crate::collaborators::{
    DeadlinePolicy, ExportFile, GraceCreditService, RepositoryAccess, Revision,
    StorageGraceCredits,
};
use crate::entity::memberships;
use crate::errors::{MarkingError, Result};
use crate::models::annotations::requests::AddAnnotationRequest;
use crate::models::results::entities::{
    ExtraMarkUnit, MarkingState, ResultStatus, TransitionAction,
};
use crate::models::submissions::entities::{Assignment, Membership};
use crate::models::submissions::requests::Direction;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::test_support::{Fixture, add_grouping, add_submission};

struct FakeRepository {
    failing: Vec<String>,
}

#[async_trait]
impl RepositoryAccess for FakeRepository {
    async fn get_latest_revision(&self, repo_name: &str) -> Result<Revision> {
        if self.failing.iter().any(|r| r == repo_name) {
            return Err(MarkingError::file_operation("repository volume unavailable"));
        }
        Ok(Revision {
            identifier: "r9".to_string(),
            timestamp: None,
        })
    }

    async fn list_files(&self, _repo_name: &str, _revision: &str) -> Result<Vec<String>> {
        Ok(vec!["main.py".to_string(), "README.md".to_string()])
    }

    async fn get_file_content(&self, _repo: &str, _revision: &str, _path: &str) -> Result<Vec<u8>> {
        Ok(b"print(1)\n".to_vec())
    }

    async fn export_zip(
        &self,
        _repo_name: &str,
        _revision: &str,
        files: &[ExportFile],
    ) -> Result<Vec<u8>> {
        Ok(format!("{files:?}").into_bytes())
    }
}

struct FixedDeadline(bool);

#[async_trait]
impl DeadlinePolicy for FixedDeadline {
    async fn remark_deadline_passed(&self, _assignment: &Assignment) -> Result<bool> {
        Ok(self.0)
    }
}

/// 额度与截止时间协作者都不可用
struct Unreachable;

#[async_trait]
impl DeadlinePolicy for Unreachable {
    async fn remark_deadline_passed(&self, _assignment: &Assignment) -> Result<bool> {
        Err(MarkingError::file_operation("calendar service timed out"))
    }
}

#[async_trait]
impl GraceCreditService for Unreachable {
    async fn remaining_credits(&self, _student_id: i64) -> Result<i64> {
        Err(MarkingError::database_connection("credit ledger offline"))
    }

    async fn can_deduct(&self, student_id: i64, _units: i32) -> Result<bool> {
        self.remaining_credits(student_id).await.map(|_| true)
    }
}

fn engine_with(fx: &Fixture, deadline_passed: bool, failing: &[&str]) -> GradingEngine {
    let storage: Arc<dyn Storage> = Arc::new(fx.storage());
    GradingEngine::new(
        storage.clone(),
        Arc::new(FakeRepository {
            failing: failing.iter().map(|s| s.to_string()).collect(),
        }),
        Arc::new(StorageGraceCredits::new(storage)),
        Arc::new(FixedDeadline(deadline_passed)),
    )
}

fn engine(fx: &Fixture) -> GradingEngine {
    engine_with(fx, false, &[])
}

fn rubric_key(fx: &Fixture) -> String {
    format!("RubricCriterion-{}", fx.rubric_id)
}

fn flexible_key(fx: &Fixture) -> String {
    format!("FlexibleCriterion-{}", fx.flexible_id)
}

/// 打分并标记完成、发布
async fn release_graded(engine: &GradingEngine, fx: &Fixture) {
    engine
        .apply_mark(fx.result_id, &flexible_key(fx), json!(5), None)
        .await
        .unwrap();
    engine
        .transition(fx.result_id, TransitionAction::Complete)
        .await
        .unwrap();
    engine
        .transition(fx.result_id, TransitionAction::Release)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rubric_flexible_and_percentage_bonus_total() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);

    engine
        .apply_mark(fx.result_id, &rubric_key(&fx), json!(2), None)
        .await
        .unwrap();
    let update = engine
        .apply_mark(fx.result_id, &flexible_key(&fx), json!(7), None)
        .await
        .unwrap();
    assert_eq!(update.total_mark, dec!(9));
    assert_eq!(update.total_possible, dec!(14));
    assert_eq!(update.num_marked, 0);

    engine
        .add_extra_mark(fx.result_id, dec!(10), ExtraMarkUnit::Percentage, None)
        .await
        .unwrap();

    let first = engine.recompute_total(fx.result_id).await.unwrap();
    let second = engine.recompute_total(fx.result_id).await.unwrap();
    assert_eq!(first.total_mark, dec!(10.4));
    assert_eq!(first.total_possible, dec!(14));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_oversized_extra_marks_are_rejected() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);

    for (value, unit) in [
        (rust_decimal::Decimal::MAX, ExtraMarkUnit::Points),
        (dec!(1000001), ExtraMarkUnit::Points),
        (dec!(-5000), ExtraMarkUnit::Percentage),
    ] {
        assert!(matches!(
            engine.add_extra_mark(fx.result_id, value, unit, None).await,
            Err(MarkingError::OutOfRange(_))
        ));
    }

    engine
        .add_extra_mark(fx.result_id, dec!(1000000), ExtraMarkUnit::Points, None)
        .await
        .unwrap();
    engine
        .add_extra_mark(fx.result_id, dec!(1000), ExtraMarkUnit::Percentage, None)
        .await
        .unwrap();
    let totals = engine.recompute_total(fx.result_id).await.unwrap();
    // 满分 14，1000% 为 140
    assert_eq!(totals.extra_total, dec!(1000140));
    assert_eq!(totals.total_mark, dec!(1000140));
}

#[tokio::test]
async fn test_mark_input_errors() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);

    assert!(matches!(
        engine.apply_mark(fx.result_id, "Criterion-1", json!(1), None).await,
        Err(MarkingError::Validation(_))
    ));
    assert!(matches!(
        engine
            .apply_mark(fx.result_id, &flexible_key(&fx), json!(11), None)
            .await,
        Err(MarkingError::OutOfRange(_))
    ));
    let wrong_type = format!("CheckboxCriterion-{}", fx.flexible_id);
    assert!(matches!(
        engine.apply_mark(fx.result_id, &wrong_type, json!(true), None).await,
        Err(MarkingError::Validation(_))
    ));

    // 清除分数
    engine
        .apply_mark(fx.result_id, &flexible_key(&fx), json!(4), None)
        .await
        .unwrap();
    let cleared = engine
        .apply_mark(fx.result_id, &flexible_key(&fx), serde_json::Value::Null, None)
        .await
        .unwrap();
    assert_eq!(cleared.mark.mark, None);
    assert_eq!(cleared.total_mark, dec!(0));
}

#[tokio::test]
async fn test_complete_requires_marks_or_comment() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);

    assert!(matches!(
        engine
            .transition(fx.result_id, TransitionAction::Complete)
            .await,
        Err(MarkingError::InvalidTransition(_))
    ));

    engine
        .update_overall_comment(fx.result_id, Some("Nice work".to_string()))
        .await
        .unwrap();
    let completed = engine.toggle_marking_state(fx.result_id).await.unwrap();
    assert_eq!(completed.marking_state, MarkingState::Complete);

    // 完成后不可编辑
    assert!(matches!(
        engine
            .apply_mark(fx.result_id, &flexible_key(&fx), json!(3), None)
            .await,
        Err(MarkingError::InvalidTransition(_))
    ));

    let reopened = engine.toggle_marking_state(fx.result_id).await.unwrap();
    assert_eq!(reopened.marking_state, MarkingState::Incomplete);
}

#[tokio::test]
async fn test_release_batch_reports_each_result() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);
    let other_grouping = add_grouping(&fx.db, fx.assignment_id, "group_0002").await;
    let (_, other_result) = add_submission(&fx.db, other_grouping).await;

    engine
        .apply_mark(fx.result_id, &flexible_key(&fx), json!(8), None)
        .await
        .unwrap();
    engine
        .transition(fx.result_id, TransitionAction::Complete)
        .await
        .unwrap();

    let outcome = engine.release(&[fx.result_id, other_result, 9999], true).await;
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.failed, 2);
    assert!(outcome.items[0].success);
    assert_eq!(outcome.items[1].error_code.as_deref(), Some("E002"));
    assert_eq!(outcome.items[2].error_code.as_deref(), Some("E007"));

    let released = fx.storage().get_result(fx.result_id).await.unwrap().unwrap();
    assert!(released.released_to_students);

    // 已发布的结果不能直接重新打开
    assert!(matches!(
        engine.toggle_marking_state(fx.result_id).await,
        Err(MarkingError::InvalidTransition(_))
    ));

    let outcome = engine.release(&[fx.result_id, other_result], false).await;
    assert_eq!(outcome.failed, 0);
}

#[tokio::test]
async fn test_remark_lifecycle() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);

    assert!(matches!(
        engine.request_remark(fx.submission_id, None).await,
        Err(MarkingError::RemarkNotAllowed(_))
    ));

    release_graded(&engine, &fx).await;
    let remark = engine
        .request_remark(fx.submission_id, Some(" Q2 was correct ".to_string()))
        .await
        .unwrap();
    assert!(remark.is_remark);
    assert_eq!(remark.marking_state, MarkingState::Incomplete);
    assert_eq!(remark.remark_request_text.as_deref(), Some("Q2 was correct"));
    assert_eq!(remark.total_mark, dec!(0));

    assert!(matches!(
        engine.request_remark(fx.submission_id, None).await,
        Err(MarkingError::RemarkNotAllowed(_))
    ));
    assert_eq!(
        engine.current_result(fx.submission_id).await.unwrap().id,
        fx.result_id
    );
    let rows = engine.submission_rows(fx.assignment_id).await.unwrap();
    assert_eq!(rows[0].marking_state, ResultStatus::RemarkRequested);
    assert_eq!(rows[0].result_id, Some(remark.id));

    let current = engine.cancel_remark(fx.submission_id).await.unwrap();
    assert_eq!(current.id, fx.result_id);
    assert!(fx.storage().get_result(remark.id).await.unwrap().is_none());

    // 重新申请并完成复评
    let remark = engine
        .transition(fx.result_id, TransitionAction::RequestRemark)
        .await
        .unwrap();
    engine
        .apply_mark(remark.id, &flexible_key(&fx), json!(9), None)
        .await
        .unwrap();
    engine
        .transition(remark.id, TransitionAction::Complete)
        .await
        .unwrap();
    let current = engine.current_result(fx.submission_id).await.unwrap();
    assert_eq!(current.id, remark.id);
    assert_eq!(current.total_mark, dec!(9));

    assert!(matches!(
        engine.cancel_remark(fx.submission_id).await,
        Err(MarkingError::CannotCancel(_))
    ));

    let view = engine.view_result(remark.id, None).await.unwrap();
    let old = view.old_marks.unwrap();
    assert_eq!(old[&flexible_key(&fx)].mark, Some(dec!(5)));
    assert_eq!(view.marks[&flexible_key(&fx)].mark, Some(dec!(9)));
}

#[tokio::test]
async fn test_remark_rejected_after_deadline() {
    let fx = Fixture::new().await;
    let engine = engine_with(&fx, true, &[]);
    release_graded(&engine, &fx).await;

    assert!(matches!(
        engine.request_remark(fx.submission_id, None).await,
        Err(MarkingError::RemarkNotAllowed(_))
    ));
    assert!(matches!(
        engine.cancel_remark(fx.submission_id).await,
        Err(MarkingError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_grace_deductions_respect_balance() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);

    let first = engine
        .add_grace_period_deduction(fx.membership_id, 2)
        .await
        .unwrap();
    assert!(matches!(
        engine.add_grace_period_deduction(fx.membership_id, 2).await,
        Err(MarkingError::Validation(_))
    ));
    assert!(matches!(
        engine.add_grace_period_deduction(fx.membership_id, 0).await,
        Err(MarkingError::Validation(_))
    ));

    let other_grouping = add_grouping(&fx.db, fx.assignment_id, "group_0002").await;
    assert!(matches!(
        engine
            .delete_grace_period_deduction(other_grouping, first.id)
            .await,
        Err(MarkingError::NotFound(_))
    ));
    let list = engine.grace_period_deductions(fx.grouping_id).await.unwrap();
    assert_eq!(list.total_units, 2);

    engine
        .delete_grace_period_deduction(fx.grouping_id, first.id)
        .await
        .unwrap();
    let list = engine.grace_period_deductions(fx.grouping_id).await.unwrap();
    assert_eq!(list.total_units, 0);
    assert!(list.items.is_empty());

    // 未加入小组的成员不可扣除
    let pending = memberships::ActiveModel {
        grouping_id: Set(other_grouping),
        student_id: Set(fx.student_id),
        membership_status: Set(Membership::STATUS_PENDING.to_string()),
        ..Default::default()
    }
    .insert(&fx.db)
    .await
    .unwrap();
    assert!(matches!(
        engine.add_grace_period_deduction(pending.id, 1).await,
        Err(MarkingError::Validation(_))
    ));

    // 删除后额度恢复
    engine
        .add_grace_period_deduction(fx.membership_id, 3)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_annotation_deductions_follow_totals() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);
    let text_id = fx
        .annotation_text(Some(fx.flexible_id), "Off by one", Some(3.0))
        .await;

    engine
        .apply_mark(fx.result_id, &flexible_key(&fx), json!(5), None)
        .await
        .unwrap();
    let req = |file: &str| AddAnnotationRequest {
        annotation_text_id: text_id,
        submission_file: file.to_string(),
        line_start: 3,
        line_end: 4,
    };
    let first = engine.add_annotation(fx.result_id, req("main.py")).await.unwrap();
    assert_eq!(first.annotation_number, 1);
    assert_eq!(first.deduction, Some(dec!(3)));
    let second = engine.add_annotation(fx.result_id, req("main.py")).await.unwrap();
    assert_eq!(second.annotation_number, 2);

    // 扣分超过得分时该项记 0
    let totals = engine.recompute_total(fx.result_id).await.unwrap();
    assert_eq!(totals.total_mark, dec!(0));

    let totals = engine.remove_annotation(second.id).await.unwrap();
    assert_eq!(totals.total_mark, dec!(2));

    assert!(matches!(
        engine.add_annotation(fx.result_id, req("  ")).await,
        Err(MarkingError::Validation(_))
    ));
    assert!(matches!(
        engine.remove_annotation(9999).await,
        Err(MarkingError::NotFound(_))
    ));

    let categories = engine.annotation_categories(fx.assignment_id).await.unwrap();
    assert_eq!(categories[0].annotation_category_name, "Bugs [Correctness]");
    assert_eq!(categories[0].flexible_criterion_id, Some(fx.flexible_id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_extra_marks_both_persist() {
    let fx = Fixture::on_file().await;
    let engine = engine(&fx);
    engine
        .apply_mark(fx.result_id, &flexible_key(&fx), json!(4), None)
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        engine.add_extra_mark(fx.result_id, dec!(1), ExtraMarkUnit::Points, None),
        engine.add_extra_mark(
            fx.result_id,
            dec!(2.5),
            ExtraMarkUnit::Points,
            Some("bonus".to_string())
        ),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.id, b.id);

    let totals = engine.recompute_total(fx.result_id).await.unwrap();
    assert_eq!(totals.extra_total, dec!(3.5));
    assert_eq!(totals.total_mark, dec!(7.5));

    let totals = engine.remove_extra_mark(a.id).await.unwrap();
    assert_eq!(totals.total_mark, dec!(6.5));
    assert!(matches!(
        engine.remove_extra_mark(a.id).await,
        Err(MarkingError::NotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_release_on_file_pool() {
    let fx = Fixture::on_file().await;
    let engine = engine(&fx);

    let mut completed = vec![fx.result_id];
    for name in ["group_0002", "group_0003", "group_0004"] {
        let grouping = add_grouping(&fx.db, fx.assignment_id, name).await;
        let (_, result) = add_submission(&fx.db, grouping).await;
        completed.push(result);
    }
    for &result in &completed {
        engine
            .apply_mark(result, &flexible_key(&fx), json!(6), None)
            .await
            .unwrap();
        engine
            .transition(result, TransitionAction::Complete)
            .await
            .unwrap();
    }
    let pending_grouping = add_grouping(&fx.db, fx.assignment_id, "group_0005").await;
    let (_, pending) = add_submission(&fx.db, pending_grouping).await;

    let mut ids = completed.clone();
    ids.push(pending);
    let outcome = engine.release(&ids, true).await;
    assert_eq!(outcome.succeeded, 4);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.items[4].error_code.as_deref(), Some("E002"));

    let storage = fx.storage();
    for id in completed {
        let result = storage.get_result(id).await.unwrap().unwrap();
        assert!(result.released_to_students);
        assert_eq!(result.total_mark, dec!(6));
    }
}

#[tokio::test]
async fn test_collaborator_failures_are_external_errors() {
    let fx = Fixture::new().await;
    let storage: Arc<dyn Storage> = Arc::new(fx.storage());
    let engine = GradingEngine::new(
        storage,
        Arc::new(FakeRepository { failing: vec![] }),
        Arc::new(Unreachable),
        Arc::new(Unreachable),
    );

    let err = engine
        .add_grace_period_deduction(fx.membership_id, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, MarkingError::ExternalCollaborator(_)));
    assert_eq!(err.code(), "E006");

    let err = engine
        .request_remark(fx.submission_id, Some("Q1".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, MarkingError::ExternalCollaborator(_)));

    // 协作者失败不留下任何记录
    assert!(
        engine
            .grace_period_deductions(fx.grouping_id)
            .await
            .unwrap()
            .items
            .is_empty()
    );
    assert!(!engine.current_result(fx.submission_id).await.unwrap().is_remark);
}

#[tokio::test]
async fn test_collect_submissions_partial_success() {
    let fx = Fixture::new().await;
    let engine = engine_with(&fx, false, &["group_0003"]);
    let fresh = add_grouping(&fx.db, fx.assignment_id, "group_0002").await;
    let broken = add_grouping(&fx.db, fx.assignment_id, "group_0003").await;

    let outcome = engine
        .collect_submissions(fx.assignment_id, &[fx.grouping_id, fresh, broken], false)
        .await
        .unwrap();
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.items[0].error_code.as_deref(), Some("E008"));
    assert!(outcome.items[1].success);
    assert_eq!(outcome.items[2].error_code.as_deref(), Some("E006"));

    let collected = outcome.items[1].data.as_ref().unwrap();
    assert_eq!(collected.revision_identifier, "r9");
    assert_eq!(collected.submission_version, 1);

    let outcome = engine
        .collect_submissions(fx.assignment_id, &[fx.grouping_id], true)
        .await
        .unwrap();
    assert_eq!(outcome.items[0].data.as_ref().unwrap().submission_version, 2);

    let rows = engine.submission_rows(fx.assignment_id).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].marking_state, ResultStatus::InProgress);
    assert_eq!(rows[0].revision_identifier.as_deref(), Some("r9"));
    assert_eq!(rows[2].marking_state, ResultStatus::NotCollected);
    assert_eq!(rows[2].final_grade, None);
}

#[tokio::test]
async fn test_view_result_anonymized() {
    let fx = Fixture::with_options(true, true).await;
    let engine = engine(&fx);
    engine
        .add_grace_period_deduction(fx.membership_id, 1)
        .await
        .unwrap();
    engine
        .apply_mark(fx.result_id, &rubric_key(&fx), json!(3), None)
        .await
        .unwrap();

    let view = engine.view_result(fx.result_id, None).await.unwrap();
    assert_eq!(view.group_name, format!("Group {}", fx.grouping_id));
    assert!(view.grace_period_deductions.is_empty());
    assert_eq!(view.status, ResultStatus::InProgress);
    assert!(view.old_marks.is_none());

    let rubric = &view.marks[&rubric_key(&fx)];
    assert_eq!(rubric.score, Some(dec!(3)));
    assert_eq!(rubric.max_mark, dec!(4));
    let flexible = &view.marks[&flexible_key(&fx)];
    assert_eq!(flexible.mark, None);
    assert_eq!(view.totals.total_mark, dec!(3));
}

#[tokio::test]
async fn test_download_zip_name_and_annotations() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);
    let text_id = fx.annotation_text(None, "Unused import", None).await;
    engine
        .add_annotation(
            fx.result_id,
            AddAnnotationRequest {
                annotation_text_id: text_id,
                submission_file: "main.py".to_string(),
                line_start: 1,
                line_end: 1,
            },
        )
        .await
        .unwrap();

    let plain = engine.download_zip(fx.submission_id, false).await.unwrap();
    assert_eq!(plain.file_name, "A1_group_0001_rr1.zip");
    assert!(!String::from_utf8_lossy(&plain.bytes).contains("Unused import"));

    let annotated = engine.download_zip(fx.submission_id, true).await.unwrap();
    assert_eq!(annotated.file_name, "A1_group_0001_rr1_ann.zip");
    assert!(String::from_utf8_lossy(&annotated.bytes).contains("#1 (lines 1-1): Unused import"));
}

#[tokio::test]
async fn test_grade_distribution_skips_pending_remarks() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);
    let second = add_grouping(&fx.db, fx.assignment_id, "group_0002").await;
    let (_, second_result) = add_submission(&fx.db, second).await;

    release_graded(&engine, &fx).await;
    engine
        .apply_mark(second_result, &flexible_key(&fx), json!(10), None)
        .await
        .unwrap();
    engine
        .apply_mark(second_result, &rubric_key(&fx), json!(4), None)
        .await
        .unwrap();
    engine
        .transition(second_result, TransitionAction::Complete)
        .await
        .unwrap();

    let dist = engine
        .grade_distribution(fx.assignment_id, Some(4))
        .await
        .unwrap();
    assert_eq!(dist.count, 2);
    // 5/14 ≈ 35.71% 与 100%
    assert_eq!(dist.buckets, vec![0, 1, 0, 1]);

    engine.request_remark(fx.submission_id, None).await.unwrap();
    let dist = engine.grade_distribution(fx.assignment_id, None).await.unwrap();
    assert_eq!(dist.count, 1);
    assert_eq!(dist.buckets.len(), 10);
    assert_eq!(dist.average, dec!(100));

    assert!(matches!(
        engine
            .grade_distribution(fx.assignment_id, Some(usize::MAX))
            .await,
        Err(MarkingError::Validation(_))
    ));
}

#[tokio::test]
async fn test_tags_are_idempotent() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);

    assert!(matches!(
        engine.create_tag("   ", None).await,
        Err(MarkingError::Validation(_))
    ));
    let tag = engine
        .create_tag(" needs-review ", Some("second look".to_string()))
        .await
        .unwrap();
    assert_eq!(tag.name, "needs-review");

    engine.add_tag(fx.grouping_id, tag.id).await.unwrap();
    let tags = engine.add_tag(fx.grouping_id, tag.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert!(matches!(
        engine.add_tag(fx.grouping_id, 9999).await,
        Err(MarkingError::NotFound(_))
    ));

    let rows = engine.submission_rows(fx.assignment_id).await.unwrap();
    assert_eq!(rows[0].tags, vec!["needs-review".to_string()]);

    assert!(engine.remove_tag(fx.grouping_id, tag.id).await.unwrap().is_empty());
    assert!(engine.remove_tag(fx.grouping_id, tag.id).await.unwrap().is_empty());
    assert_eq!(engine.list_tags().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_grader_view_shows_assigned_criteria() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);
    let grader = fx
        .add_grader("ta1", &[fx.grouping_id], &[fx.flexible_id])
        .await;

    let view = engine.view_result(fx.result_id, Some(grader)).await.unwrap();
    assert!(view.assigned_criteria.is_none());
    assert_eq!(view.marks.len(), 2);

    fx.assign_criteria_to_graders(false).await;
    let view = engine.view_result(fx.result_id, Some(grader)).await.unwrap();
    assert_eq!(view.assigned_criteria, Some(vec![flexible_key(&fx)]));
    assert_eq!(view.marks.len(), 2);
    // 不带阅卷人时不做限制
    let view = engine.view_result(fx.result_id, None).await.unwrap();
    assert!(view.assigned_criteria.is_none());

    fx.assign_criteria_to_graders(true).await;
    release_graded(&engine, &fx).await;
    let remark = engine.request_remark(fx.submission_id, None).await.unwrap();
    let view = engine.view_result(remark.id, Some(grader)).await.unwrap();
    assert_eq!(
        view.marks.keys().cloned().collect::<Vec<_>>(),
        vec![flexible_key(&fx)]
    );
    let old = view.old_marks.unwrap();
    assert_eq!(old.len(), 1);
    assert_eq!(old[&flexible_key(&fx)].mark, Some(dec!(5)));
}

#[tokio::test]
async fn test_unknown_grader_is_rejected_before_write() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);

    assert!(matches!(
        engine.view_result(fx.result_id, Some(9999)).await,
        Err(MarkingError::NotFound(_))
    ));
    assert!(matches!(
        engine
            .apply_mark(fx.result_id, &flexible_key(&fx), json!(4), Some(9999))
            .await,
        Err(MarkingError::NotFound(_))
    ));
    let view = engine.view_result(fx.result_id, None).await.unwrap();
    assert_eq!(view.marks[&flexible_key(&fx)].mark, None);
}

#[tokio::test]
async fn test_num_marked_counts_only_grader_groupings() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);
    let second = add_grouping(&fx.db, fx.assignment_id, "group_0002").await;
    let (_, second_result) = add_submission(&fx.db, second).await;
    let third = add_grouping(&fx.db, fx.assignment_id, "group_0003").await;
    let (_, third_result) = add_submission(&fx.db, third).await;
    let grader = fx.add_grader("ta1", &[second, third], &[]).await;

    release_graded(&engine, &fx).await;

    let scoped = engine
        .apply_mark(second_result, &flexible_key(&fx), json!(3), Some(grader))
        .await
        .unwrap();
    assert_eq!(scoped.num_marked, 0);
    let all = engine
        .apply_mark(second_result, &flexible_key(&fx), json!(3), None)
        .await
        .unwrap();
    assert_eq!(all.num_marked, 1);

    engine
        .transition(second_result, TransitionAction::Complete)
        .await
        .unwrap();
    let scoped = engine
        .apply_mark(third_result, &flexible_key(&fx), json!(8), Some(grader))
        .await
        .unwrap();
    assert_eq!(scoped.num_marked, 1);
    let all = engine
        .apply_mark(third_result, &flexible_key(&fx), json!(8), None)
        .await
        .unwrap();
    assert_eq!(all.num_marked, 2);
}

#[tokio::test]
async fn test_next_grouping_skips_uncollected() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);
    let third = add_grouping(&fx.db, fx.assignment_id, "group_0003").await;
    let (third_submission, third_result) = add_submission(&fx.db, third).await;
    add_grouping(&fx.db, fx.assignment_id, "group_0002").await;
    let fourth = add_grouping(&fx.db, fx.assignment_id, "group_0004").await;
    add_submission(&fx.db, fourth).await;

    let next = engine
        .next_grouping(fx.grouping_id, Direction::Next, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.grouping_id, third);
    assert_eq!(next.group_name, "group_0003");
    assert_eq!(next.submission_id, third_submission);
    assert_eq!(next.result_id, third_result);

    let previous = engine
        .next_grouping(third, Direction::Previous, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(previous.grouping_id, fx.grouping_id);

    assert!(engine
        .next_grouping(fourth, Direction::Next, None)
        .await
        .unwrap()
        .is_none());
    assert!(engine
        .next_grouping(fx.grouping_id, Direction::Previous, None)
        .await
        .unwrap()
        .is_none());

    let grader = fx.add_grader("ta1", &[fourth], &[]).await;
    let scoped = engine
        .next_grouping(fx.grouping_id, Direction::Next, Some(grader))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(scoped.grouping_id, fourth);

    assert!(matches!(
        engine.next_grouping(9999, Direction::Next, None).await,
        Err(MarkingError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_download_file_content_types() {
    let fx = Fixture::new().await;
    let engine = engine(&fx);

    let source = engine
        .download_file(fx.submission_id, "src/main.py", false)
        .await
        .unwrap();
    assert_eq!(source.file_name, "main.py");
    assert_eq!(source.content_type, "text/plain; charset=utf-8");
    assert!(!source.inline);
    assert_eq!(source.bytes, b"print(1)\n".to_vec());

    let image = engine
        .download_file(fx.submission_id, "shots/Plot.PNG", true)
        .await
        .unwrap();
    assert_eq!(image.file_name, "Plot.PNG");
    assert_eq!(image.content_type, "image/png");
    assert!(image.inline);

    let attachment = engine
        .download_file(fx.submission_id, "plot.png", false)
        .await
        .unwrap();
    assert_eq!(attachment.content_type, "application/octet-stream");
    assert!(!attachment.inline);

    assert!(matches!(
        engine.download_file(fx.submission_id, "  ", false).await,
        Err(MarkingError::Validation(_))
    ));
    assert!(matches!(
        engine.download_file(9999, "main.py", false).await,
        Err(MarkingError::NotFound(_))
    ));
}
