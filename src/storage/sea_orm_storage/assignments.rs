//! 作业、小组与学生存储操作

use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use super::snapshot::{db_err, load_criteria};
use crate::entity::prelude::*;
use crate::entity::{
    grace_period_deductions, grouping_tags, groupings, memberships, results, submissions, tags,
};
use crate::errors::Result;
use crate::models::{
    criteria::entities::Criterion,
    results::entities::GradingResult,
    submissions::entities::{Assignment, Grouping, GroupingOverview, Membership, Student},
    tags::entities::Tag,
};

impl SeaOrmStorage {
    pub async fn get_assignment_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询作业失败"))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    pub async fn get_grouping_impl(&self, grouping_id: i64) -> Result<Option<Grouping>> {
        let result = Groupings::find_by_id(grouping_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询小组失败"))?;

        Ok(result.map(|m| m.into_grouping()))
    }

    pub async fn list_criteria_impl(&self, assignment_id: i64) -> Result<Vec<Criterion>> {
        load_criteria(&self.db, assignment_id).await
    }

    /// 作业下所有小组的概览，按小组 ID 排序
    pub async fn list_grouping_overviews_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<GroupingOverview>> {
        let grouping_rows = Groupings::find()
            .filter(groupings::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(groupings::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询小组列表失败"))?;
        if grouping_rows.is_empty() {
            return Ok(Vec::new());
        }
        let grouping_ids: Vec<i64> = grouping_rows.iter().map(|g| g.id).collect();

        // 当前使用的提交
        let mut current_submissions: HashMap<i64, submissions::Model> = HashMap::new();
        for submission in Submissions::find()
            .filter(submissions::Column::GroupingId.is_in(grouping_ids.clone()))
            .filter(submissions::Column::VersionUsed.eq(true))
            .order_by_asc(submissions::Column::SubmissionVersion)
            .all(&self.db)
            .await
            .map_err(db_err("查询提交失败"))?
        {
            current_submissions.insert(submission.grouping_id, submission);
        }

        let submission_ids: Vec<i64> = current_submissions.values().map(|s| s.id).collect();
        let mut results_by_submission: HashMap<i64, Vec<GradingResult>> = HashMap::new();
        if !submission_ids.is_empty() {
            for row in Results::find()
                .filter(results::Column::SubmissionId.is_in(submission_ids))
                .order_by_asc(results::Column::Id)
                .all(&self.db)
                .await
                .map_err(db_err("查询批改结果失败"))?
            {
                let submission_id = row.submission_id;
                results_by_submission
                    .entry(submission_id)
                    .or_default()
                    .push(row.into_result()?);
            }
        }

        // 标签
        let links = GroupingTags::find()
            .filter(grouping_tags::Column::GroupingId.is_in(grouping_ids.clone()))
            .all(&self.db)
            .await
            .map_err(db_err("查询小组标签失败"))?;
        let tag_ids: Vec<i64> = links.iter().map(|l| l.tag_id).collect();
        let tag_map: HashMap<i64, Tag> = if tag_ids.is_empty() {
            HashMap::new()
        } else {
            Tags::find()
                .filter(tags::Column::Id.is_in(tag_ids))
                .all(&self.db)
                .await
                .map_err(db_err("查询标签失败"))?
                .into_iter()
                .map(|t| (t.id, t.into_tag()))
                .collect()
        };
        let mut tags_by_grouping: HashMap<i64, Vec<Tag>> = HashMap::new();
        for link in links {
            if let Some(tag) = tag_map.get(&link.tag_id) {
                tags_by_grouping
                    .entry(link.grouping_id)
                    .or_default()
                    .push(tag.clone());
            }
        }
        for tags in tags_by_grouping.values_mut() {
            tags.sort_by(|a, b| a.name.cmp(&b.name));
        }

        // 宽限期扣除
        let membership_rows = Memberships::find()
            .filter(memberships::Column::GroupingId.is_in(grouping_ids))
            .all(&self.db)
            .await
            .map_err(db_err("查询小组成员失败"))?;
        let membership_grouping: HashMap<i64, i64> = membership_rows
            .iter()
            .map(|m| (m.id, m.grouping_id))
            .collect();
        let mut grace_by_grouping: HashMap<i64, i64> = HashMap::new();
        if !membership_grouping.is_empty() {
            for deduction in GracePeriodDeductions::find()
                .filter(
                    grace_period_deductions::Column::MembershipId
                        .is_in(membership_grouping.keys().copied()),
                )
                .all(&self.db)
                .await
                .map_err(db_err("查询宽限期扣除失败"))?
            {
                if let Some(grouping_id) = membership_grouping.get(&deduction.membership_id) {
                    *grace_by_grouping.entry(*grouping_id).or_default() +=
                        i64::from(deduction.deduction);
                }
            }
        }

        let overviews = grouping_rows
            .into_iter()
            .map(|grouping| {
                let id = grouping.id;
                let submission = current_submissions.remove(&id);
                let results = submission
                    .as_ref()
                    .and_then(|s| results_by_submission.remove(&s.id))
                    .unwrap_or_default();
                GroupingOverview {
                    grouping: grouping.into_grouping(),
                    submission: submission.map(|s| s.into_submission()),
                    results,
                    tags: tags_by_grouping.remove(&id).unwrap_or_default(),
                    grace_units: grace_by_grouping.get(&id).copied().unwrap_or(0),
                }
            })
            .collect();

        Ok(overviews)
    }

    pub async fn get_student_impl(&self, student_id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询学生失败"))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_membership_impl(&self, membership_id: i64) -> Result<Option<Membership>> {
        let result = Memberships::find_by_id(membership_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询小组成员失败"))?;

        Ok(result.map(|m| m.into_membership()))
    }
}
