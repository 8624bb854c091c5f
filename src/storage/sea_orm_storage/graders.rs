//! 阅卷人分配查询

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::SeaOrmStorage;
use super::snapshot::db_err;
use crate::entity::prelude::*;
use crate::entity::{criteria, criterion_grader_associations, grader_memberships, groupings};
use crate::errors::Result;
use crate::models::graders::entities::{Grader, GraderAssignment};

impl SeaOrmStorage {
    pub async fn get_grader_impl(&self, grader_id: i64) -> Result<Option<Grader>> {
        let grader = Graders::find_by_id(grader_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询阅卷人失败"))?;
        Ok(grader.map(|g| g.into_grader()))
    }

    /// 只返回属于该作业的小组与评分标准
    pub async fn load_grader_assignment_impl(
        &self,
        grader_id: i64,
        assignment_id: i64,
    ) -> Result<GraderAssignment> {
        let grouping_ids: Vec<i64> = GraderMemberships::find()
            .select_only()
            .column(grader_memberships::Column::GroupingId)
            .inner_join(Groupings)
            .filter(grader_memberships::Column::GraderId.eq(grader_id))
            .filter(groupings::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(grader_memberships::Column::GroupingId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err("查询阅卷人小组失败"))?;

        let criterion_ids: Vec<i64> = CriterionGraderAssociations::find()
            .select_only()
            .column(criterion_grader_associations::Column::CriterionId)
            .inner_join(Criteria)
            .filter(criterion_grader_associations::Column::GraderId.eq(grader_id))
            .filter(criteria::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(criterion_grader_associations::Column::CriterionId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err("查询阅卷人评分标准失败"))?;

        Ok(GraderAssignment {
            grader_id,
            grouping_ids,
            criterion_ids,
        })
    }
}
