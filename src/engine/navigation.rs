//! 小组间导航

use tracing::debug;

use super::GradingEngine;
use crate::errors::Result;
use crate::grading::GroupingNavigator;
use crate::models::submissions::{requests::Direction, responses::GroupingNavigation};

impl GradingEngine {
    /// 同一作业中按组名顺序的相邻可批改小组；给出阅卷人时只在其负责的小组间移动
    pub async fn next_grouping(
        &self,
        grouping_id: i64,
        direction: Direction,
        grader_id: Option<i64>,
    ) -> Result<Option<GroupingNavigation>> {
        let grouping = self.grouping(grouping_id).await?;
        let assignment = self.assignment(grouping.assignment_id).await?;
        let scope = self.grader_scope(grader_id, assignment.id).await?;
        let overviews = self.storage.list_grouping_overviews(assignment.id).await?;

        let found = GroupingNavigator::neighbour(&overviews, &grouping, direction, scope.as_ref())
            .map(|(overview, result)| GroupingNavigation {
                grouping_id: overview.grouping.id,
                group_name: if assignment.anonymize_groups {
                    format!("Group {}", overview.grouping.id)
                } else {
                    overview.grouping.group_name.clone()
                },
                submission_id: result.submission_id,
                result_id: result.id,
            });
        debug!(
            "Navigation {:?} from grouping {} -> {:?}",
            direction,
            grouping_id,
            found.as_ref().map(|n| n.grouping_id)
        );
        Ok(found)
    }
}
