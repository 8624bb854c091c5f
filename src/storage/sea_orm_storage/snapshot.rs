//! 快照加载
//!
//! 这里的函数对连接类型泛型，既可在普通连接上读取，也可在事务内读取。
//! 事务内只能使用事务自身的连接。

use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::prelude::*;
use crate::entity::{
    annotation_categories, annotation_texts, annotations, criteria, extra_marks, marks, results,
    submissions,
};
use crate::errors::{MarkingError, Result};
use crate::models::{
    annotations::entities::Annotation,
    criteria::entities::Criterion,
    results::entities::{GradingResult, ResultSnapshot},
    submissions::entities::SubmissionContext,
};

pub(super) fn db_err(context: &str) -> impl FnOnce(sea_orm::DbErr) -> MarkingError + '_ {
    move |e| MarkingError::database_operation(format!("{context}: {e}"))
}

pub(super) async fn load_criteria<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
) -> Result<Vec<Criterion>> {
    Criteria::find()
        .filter(criteria::Column::AssignmentId.eq(assignment_id))
        .order_by_asc(criteria::Column::Position)
        .order_by_asc(criteria::Column::Id)
        .all(conn)
        .await
        .map_err(db_err("查询评分标准失败"))?
        .into_iter()
        .map(|m| m.into_criterion())
        .collect()
}

pub(super) async fn load_results_of_submission<C: ConnectionTrait>(
    conn: &C,
    submission_id: i64,
) -> Result<Vec<GradingResult>> {
    Results::find()
        .filter(results::Column::SubmissionId.eq(submission_id))
        .order_by_asc(results::Column::Id)
        .all(conn)
        .await
        .map_err(db_err("查询批改结果失败"))?
        .into_iter()
        .map(|m| m.into_result())
        .collect()
}

/// 读取批注并展开其文本与分类
pub(super) async fn load_annotations<C: ConnectionTrait>(
    conn: &C,
    result_ids: &[i64],
) -> Result<Vec<Annotation>> {
    if result_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = Annotations::find()
        .filter(annotations::Column::ResultId.is_in(result_ids.iter().copied()))
        .order_by_asc(annotations::Column::AnnotationNumber)
        .all(conn)
        .await
        .map_err(db_err("查询批注失败"))?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let text_ids: Vec<i64> = rows.iter().map(|a| a.annotation_text_id).collect();
    let texts: HashMap<i64, annotation_texts::Model> = AnnotationTexts::find()
        .filter(annotation_texts::Column::Id.is_in(text_ids))
        .all(conn)
        .await
        .map_err(db_err("查询批注文本失败"))?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    let category_ids: Vec<i64> = texts
        .values()
        .filter_map(|t| t.annotation_category_id)
        .collect();
    let categories: HashMap<i64, annotation_categories::Model> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        AnnotationCategories::find()
            .filter(annotation_categories::Column::Id.is_in(category_ids))
            .all(conn)
            .await
            .map_err(db_err("查询批注分类失败"))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let text = texts.get(&row.annotation_text_id).ok_or_else(|| {
            MarkingError::not_found(format!("Annotation text {} not found", row.annotation_text_id))
        })?;
        let category = text
            .annotation_category_id
            .and_then(|id| categories.get(&id));
        out.push(row.into_annotation(text, category)?);
    }
    Ok(out)
}

pub(super) async fn load_result_snapshot<C: ConnectionTrait>(
    conn: &C,
    result_id: i64,
) -> Result<Option<ResultSnapshot>> {
    let Some(result) = Results::find_by_id(result_id)
        .one(conn)
        .await
        .map_err(db_err("查询批改结果失败"))?
    else {
        return Ok(None);
    };
    let result = result.into_result()?;

    let submission = Submissions::find_by_id(result.submission_id)
        .one(conn)
        .await
        .map_err(db_err("查询提交失败"))?
        .ok_or_else(|| {
            MarkingError::not_found(format!("Submission {} not found", result.submission_id))
        })?;
    let grouping = Groupings::find_by_id(submission.grouping_id)
        .one(conn)
        .await
        .map_err(db_err("查询小组失败"))?
        .ok_or_else(|| {
            MarkingError::not_found(format!("Grouping {} not found", submission.grouping_id))
        })?;

    let criteria = load_criteria(conn, grouping.assignment_id).await?;

    let marks = Marks::find()
        .filter(marks::Column::ResultId.eq(result_id))
        .order_by_asc(marks::Column::Id)
        .all(conn)
        .await
        .map_err(db_err("查询分项分数失败"))?
        .into_iter()
        .map(|m| m.into_mark())
        .collect::<Result<Vec<_>>>()?;

    let extra_marks = ExtraMarks::find()
        .filter(extra_marks::Column::ResultId.eq(result_id))
        .order_by_asc(extra_marks::Column::Id)
        .all(conn)
        .await
        .map_err(db_err("查询附加分失败"))?
        .into_iter()
        .map(|m| m.into_extra_mark())
        .collect::<Result<Vec<_>>>()?;

    let annotations = load_annotations(conn, &[result_id]).await?;

    Ok(Some(ResultSnapshot {
        result,
        assignment_id: grouping.assignment_id,
        grouping_id: grouping.id,
        criteria,
        marks,
        extra_marks,
        annotations,
    }))
}

pub(super) async fn load_submission_context<C: ConnectionTrait>(
    conn: &C,
    submission_id: i64,
) -> Result<Option<SubmissionContext>> {
    let Some(submission) = Submissions::find_by_id(submission_id)
        .one(conn)
        .await
        .map_err(db_err("查询提交失败"))?
    else {
        return Ok(None);
    };
    let grouping = Groupings::find_by_id(submission.grouping_id)
        .one(conn)
        .await
        .map_err(db_err("查询小组失败"))?
        .ok_or_else(|| {
            MarkingError::not_found(format!("Grouping {} not found", submission.grouping_id))
        })?;
    let assignment = Assignments::find_by_id(grouping.assignment_id)
        .one(conn)
        .await
        .map_err(db_err("查询作业失败"))?
        .ok_or_else(|| {
            MarkingError::not_found(format!("Assignment {} not found", grouping.assignment_id))
        })?;
    let results = load_results_of_submission(conn, submission.id).await?;

    Ok(Some(SubmissionContext {
        submission: submission.into_submission(),
        grouping: grouping.into_grouping(),
        assignment: assignment.into_assignment(),
        results,
    }))
}

/// 小组当前使用的提交
pub(super) async fn current_submission_of<C: ConnectionTrait>(
    conn: &C,
    grouping_id: i64,
) -> Result<Option<submissions::Model>> {
    Submissions::find()
        .filter(submissions::Column::GroupingId.eq(grouping_id))
        .filter(submissions::Column::VersionUsed.eq(true))
        .order_by_desc(submissions::Column::SubmissionVersion)
        .one(conn)
        .await
        .map_err(db_err("查询提交失败"))
}
