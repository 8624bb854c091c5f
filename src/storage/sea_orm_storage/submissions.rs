//! 提交存储操作

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::results::delete_result_rows;
use super::snapshot::{db_err, load_submission_context};
use crate::collaborators::Revision;
use crate::entity::prelude::*;
use crate::entity::{results, submissions};
use crate::errors::{MarkingError, Result};
use crate::models::{
    results::{
        entities::{GradingResult, MarkingState},
        mutations::{SubmissionMutation, SubmissionMutationOutcome},
    },
    submissions::entities::Submission,
};
use crate::storage::SubmissionMutator;

impl SeaOrmStorage {
    /// 收取新版本（自动计算版本号），旧版本不再使用
    pub async fn create_collected_submission_impl(
        &self,
        grouping_id: i64,
        revision: Revision,
    ) -> Result<(Submission, GradingResult)> {
        let now = chrono::Utc::now().timestamp();
        let _gate = self.write_gate().await;
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        Groupings::find_by_id(grouping_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err("锁定小组失败"))?
            .ok_or_else(|| MarkingError::not_found(format!("Grouping {grouping_id} not found")))?;

        // 查询当前最大版本号
        let max_version = Submissions::find()
            .filter(submissions::Column::GroupingId.eq(grouping_id))
            .select_only()
            .column_as(submissions::Column::SubmissionVersion.max(), "max_version")
            .into_tuple::<Option<i32>>()
            .one(&txn)
            .await
            .map_err(db_err("查询最大版本号失败"))?
            .flatten()
            .unwrap_or(0);

        Submissions::update_many()
            .col_expr(
                submissions::Column::VersionUsed,
                sea_orm::sea_query::Expr::value(false),
            )
            .filter(submissions::Column::GroupingId.eq(grouping_id))
            .exec(&txn)
            .await
            .map_err(db_err("更新旧提交失败"))?;

        let submission = submissions::ActiveModel {
            grouping_id: Set(grouping_id),
            revision_identifier: Set(revision.identifier),
            revision_timestamp: Set(revision.timestamp.map(|t| t.timestamp())),
            submission_version: Set(max_version + 1),
            version_used: Set(true),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("创建提交失败"))?;

        let result = results::ActiveModel {
            submission_id: Set(submission.id),
            marking_state: Set(MarkingState::Incomplete.to_string()),
            total_mark: Set(0.0),
            overall_comment: Set(None),
            released_to_students: Set(false),
            is_remark: Set(false),
            remark_request_timestamp: Set(None),
            remark_request_text: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("创建批改结果失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        info!(
            "Collected grouping {} as submission {} (version {})",
            grouping_id, submission.id, submission.submission_version
        );

        Ok((submission.into_submission(), result.into_result()?))
    }

    /// 锁定提交行后执行复评相关变更
    pub async fn mutate_submission_impl(
        &self,
        submission_id: i64,
        mutator: SubmissionMutator,
    ) -> Result<SubmissionMutationOutcome> {
        let _gate = self.write_gate().await;
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        Submissions::find_by_id(submission_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err("锁定提交失败"))?
            .ok_or_else(|| {
                MarkingError::not_found(format!("Submission {submission_id} not found"))
            })?;

        let context = load_submission_context(&txn, submission_id)
            .await?
            .ok_or_else(|| {
                MarkingError::not_found(format!("Submission {submission_id} not found"))
            })?;

        let mutation = mutator(&context)?;
        debug!("Applying {:?} to submission {}", mutation, submission_id);

        let mut created = None;
        let mut deleted = None;
        match mutation {
            SubmissionMutation::None => {}
            SubmissionMutation::CreateRemark { requested_at, text } => {
                let now = chrono::Utc::now().timestamp();
                let model = results::ActiveModel {
                    submission_id: Set(submission_id),
                    marking_state: Set(MarkingState::Incomplete.to_string()),
                    total_mark: Set(0.0),
                    overall_comment: Set(None),
                    released_to_students: Set(false),
                    is_remark: Set(true),
                    remark_request_timestamp: Set(Some(requested_at.timestamp())),
                    remark_request_text: Set(text),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(db_err("创建复评结果失败"))?;
                created = Some(model.into_result()?);
            }
            SubmissionMutation::DeleteResult(result_id) => {
                if !context.results.iter().any(|r| r.id == result_id) {
                    return Err(MarkingError::not_found(format!(
                        "Result {result_id} not found in submission {submission_id}"
                    )));
                }
                delete_result_rows(&txn, result_id).await?;
                deleted = Some(result_id);
            }
        }

        let context = load_submission_context(&txn, submission_id)
            .await?
            .ok_or_else(|| {
                MarkingError::not_found(format!("Submission {submission_id} not found"))
            })?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(SubmissionMutationOutcome {
            created,
            deleted,
            context,
        })
    }
}
