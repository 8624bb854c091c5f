//! 批改结果存储操作

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::snapshot::{db_err, load_result_snapshot, load_submission_context};
use crate::entity::prelude::*;
use crate::entity::{annotation_categories, annotations, extra_marks, marks, results};
use crate::errors::{MarkingError, Result};
use crate::grading::MarkAggregator;
use crate::models::{
    results::{
        entities::{GradingResult, ResultSnapshot},
        mutations::{AppliedChange, ResultMutation, ResultMutationOutcome},
    },
    submissions::entities::{Submission, SubmissionContext},
};
use crate::storage::ResultMutator;
use crate::utils::decimal::decimal_to_f64;

/// 在事务内执行一个结果变更
async fn apply_result_mutation<C: ConnectionTrait>(
    conn: &C,
    snapshot: &ResultSnapshot,
    mutation: ResultMutation,
) -> Result<AppliedChange> {
    let result_id = snapshot.result.id;
    let now = chrono::Utc::now().timestamp();

    let change = match mutation {
        ResultMutation::None => AppliedChange::None,
        ResultMutation::SetMark {
            criterion_id,
            criterion_type,
            mark,
        } => {
            let existing = Marks::find()
                .filter(marks::Column::ResultId.eq(result_id))
                .filter(marks::Column::MarkableId.eq(criterion_id))
                .one(conn)
                .await
                .map_err(db_err("查询分项分数失败"))?;

            let stored = mark.map(decimal_to_f64);
            let saved = match existing {
                Some(row) => {
                    let mut model: marks::ActiveModel = row.into();
                    model.markable_type = Set(criterion_type.to_string());
                    model.mark = Set(stored);
                    model.updated_at = Set(now);
                    model.update(conn).await.map_err(db_err("更新分项分数失败"))?
                }
                None => marks::ActiveModel {
                    result_id: Set(result_id),
                    markable_id: Set(criterion_id),
                    markable_type: Set(criterion_type.to_string()),
                    mark: Set(stored),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(conn)
                .await
                .map_err(db_err("创建分项分数失败"))?,
            };
            AppliedChange::Mark(saved.id)
        }
        ResultMutation::AddExtraMark {
            extra_mark,
            unit,
            description,
        } => {
            let saved = extra_marks::ActiveModel {
                result_id: Set(result_id),
                extra_mark: Set(decimal_to_f64(extra_mark)),
                unit: Set(unit.to_string()),
                description: Set(description),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(db_err("创建附加分失败"))?;
            AppliedChange::ExtraMark(saved.id)
        }
        ResultMutation::RemoveExtraMark { extra_mark_id } => {
            let deleted = ExtraMarks::delete_many()
                .filter(extra_marks::Column::Id.eq(extra_mark_id))
                .filter(extra_marks::Column::ResultId.eq(result_id))
                .exec(conn)
                .await
                .map_err(db_err("删除附加分失败"))?;
            if deleted.rows_affected == 0 {
                return Err(MarkingError::not_found(format!(
                    "Extra mark {extra_mark_id} not found"
                )));
            }
            AppliedChange::ExtraMark(extra_mark_id)
        }
        ResultMutation::SetOverallComment(comment) => {
            results::ActiveModel {
                id: Set(result_id),
                overall_comment: Set(comment),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(conn)
            .await
            .map_err(db_err("更新总评失败"))?;
            AppliedChange::None
        }
        ResultMutation::SetMarkingState(state) => {
            results::ActiveModel {
                id: Set(result_id),
                marking_state: Set(state.to_string()),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(conn)
            .await
            .map_err(db_err("更新批改状态失败"))?;
            AppliedChange::None
        }
        ResultMutation::SetReleased(released) => {
            results::ActiveModel {
                id: Set(result_id),
                released_to_students: Set(released),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(conn)
            .await
            .map_err(db_err("更新发布状态失败"))?;
            AppliedChange::None
        }
        ResultMutation::AddAnnotation {
            annotation_text_id,
            submission_file,
            line_start,
            line_end,
        } => {
            let text = AnnotationTexts::find_by_id(annotation_text_id)
                .one(conn)
                .await
                .map_err(db_err("查询批注文本失败"))?
                .ok_or_else(|| {
                    MarkingError::not_found(format!(
                        "Annotation text {annotation_text_id} not found"
                    ))
                })?;
            // 批注文本必须属于本作业的分类（或不属于任何分类）
            if let Some(category_id) = text.annotation_category_id {
                let belongs = AnnotationCategories::find_by_id(category_id)
                    .filter(annotation_categories::Column::AssignmentId.eq(snapshot.assignment_id))
                    .count(conn)
                    .await
                    .map_err(db_err("查询批注分类失败"))?
                    > 0;
                if !belongs {
                    return Err(MarkingError::not_found(format!(
                        "Annotation text {annotation_text_id} not found for this assignment"
                    )));
                }
            }

            let last_number = Annotations::find()
                .filter(annotations::Column::ResultId.eq(result_id))
                .order_by_desc(annotations::Column::AnnotationNumber)
                .one(conn)
                .await
                .map_err(db_err("查询批注失败"))?
                .map(|a| a.annotation_number)
                .unwrap_or(0);

            let saved = annotations::ActiveModel {
                result_id: Set(result_id),
                annotation_text_id: Set(text.id),
                submission_file: Set(submission_file),
                line_start: Set(line_start),
                line_end: Set(line_end),
                annotation_number: Set(last_number + 1),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(db_err("创建批注失败"))?;
            AppliedChange::Annotation(saved.id)
        }
        ResultMutation::RemoveAnnotation { annotation_id } => {
            let deleted = Annotations::delete_many()
                .filter(annotations::Column::Id.eq(annotation_id))
                .filter(annotations::Column::ResultId.eq(result_id))
                .exec(conn)
                .await
                .map_err(db_err("删除批注失败"))?;
            if deleted.rows_affected == 0 {
                return Err(MarkingError::not_found(format!(
                    "Annotation {annotation_id} not found"
                )));
            }
            AppliedChange::Annotation(annotation_id)
        }
    };

    Ok(change)
}

/// 删除一个结果及其分项、附加分与批注
pub(super) async fn delete_result_rows<C: ConnectionTrait>(conn: &C, result_id: i64) -> Result<()> {
    Marks::delete_many()
        .filter(marks::Column::ResultId.eq(result_id))
        .exec(conn)
        .await
        .map_err(db_err("删除分项分数失败"))?;
    ExtraMarks::delete_many()
        .filter(extra_marks::Column::ResultId.eq(result_id))
        .exec(conn)
        .await
        .map_err(db_err("删除附加分失败"))?;
    Annotations::delete_many()
        .filter(annotations::Column::ResultId.eq(result_id))
        .exec(conn)
        .await
        .map_err(db_err("删除批注失败"))?;
    Results::delete_by_id(result_id)
        .exec(conn)
        .await
        .map_err(db_err("删除批改结果失败"))?;
    Ok(())
}

impl SeaOrmStorage {
    pub async fn get_submission_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询提交失败"))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_result_impl(&self, result_id: i64) -> Result<Option<GradingResult>> {
        Results::find_by_id(result_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询批改结果失败"))?
            .map(|m| m.into_result())
            .transpose()
    }

    pub async fn load_result_snapshot_impl(&self, result_id: i64) -> Result<Option<ResultSnapshot>> {
        load_result_snapshot(&self.db, result_id).await
    }

    pub async fn load_submission_context_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<SubmissionContext>> {
        load_submission_context(&self.db, submission_id).await
    }

    /// 锁定结果行，在同一事务中完成决策、写入与总分重算
    pub async fn mutate_result_impl(
        &self,
        result_id: i64,
        mutator: ResultMutator,
    ) -> Result<ResultMutationOutcome> {
        let _gate = self.write_gate().await;
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_err("开启事务失败"))?;

        // SQLite 忽略行锁，由写闸门串行化
        Results::find_by_id(result_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err("锁定批改结果失败"))?
            .ok_or_else(|| MarkingError::not_found(format!("Result {result_id} not found")))?;

        let snapshot = load_result_snapshot(&txn, result_id)
            .await?
            .ok_or_else(|| MarkingError::not_found(format!("Result {result_id} not found")))?;

        let mutation = mutator(&snapshot)?;
        debug!("Applying {:?} to result {}", mutation, result_id);
        let change = apply_result_mutation(&txn, &snapshot, mutation).await?;

        let mut snapshot = load_result_snapshot(&txn, result_id)
            .await?
            .ok_or_else(|| MarkingError::not_found(format!("Result {result_id} not found")))?;
        let totals = MarkAggregator::recompute_snapshot(&snapshot)?;

        if totals.total_mark != snapshot.result.total_mark {
            results::ActiveModel {
                id: Set(result_id),
                total_mark: Set(decimal_to_f64(totals.total_mark)),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(db_err("更新总分失败"))?;
            info!(
                "Result {} total {} -> {}",
                result_id, snapshot.result.total_mark, totals.total_mark
            );
            snapshot.result.total_mark = totals.total_mark;
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(ResultMutationOutcome {
            change,
            snapshot,
            totals,
        })
    }

    pub async fn find_extra_mark_result_impl(&self, extra_mark_id: i64) -> Result<Option<i64>> {
        let row = ExtraMarks::find_by_id(extra_mark_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询附加分失败"))?;
        Ok(row.map(|e| e.result_id))
    }

    pub async fn find_annotation_result_impl(&self, annotation_id: i64) -> Result<Option<i64>> {
        let row = Annotations::find_by_id(annotation_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询批注失败"))?;
        Ok(row.map(|a| a.result_id))
    }
}
