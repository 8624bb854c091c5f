//! 小组导航
//!
//! 在同一作业中按组名顺序查找上一个或下一个可批改的小组，
//! 只考虑已收取提交且有结果的小组。

use crate::grading::graders::GraderScope;
use crate::grading::remark::RemarkWorkflow;
use crate::models::results::entities::GradingResult;
use crate::models::submissions::entities::{Grouping, GroupingOverview};
use crate::models::submissions::requests::Direction;

pub struct GroupingNavigator;

impl GroupingNavigator {
    /// 当前小组本身不必可批改；到达两端时返回 `None`
    pub fn neighbour<'a>(
        overviews: &'a [GroupingOverview],
        current: &Grouping,
        direction: Direction,
        scope: Option<&GraderScope>,
    ) -> Option<(&'a GroupingOverview, &'a GradingResult)> {
        let mut candidates: Vec<(&GroupingOverview, &GradingResult)> = overviews
            .iter()
            .filter(|o| o.grouping.id != current.id && o.submission.is_some())
            .filter(|o| scope.is_none_or(|s| s.covers_grouping(o.grouping.id)))
            .filter_map(|o| RemarkWorkflow::working_result(&o.results).map(|r| (o, r)))
            .collect();
        candidates.sort_by(|(a, _), (b, _)| {
            (&a.grouping.group_name, a.grouping.id).cmp(&(&b.grouping.group_name, b.grouping.id))
        });

        let position = (&current.group_name, current.id);
        match direction {
            Direction::Next => candidates
                .into_iter()
                .find(|(o, _)| (&o.grouping.group_name, o.grouping.id) > position),
            Direction::Previous => candidates
                .into_iter()
                .rev()
                .find(|(o, _)| (&o.grouping.group_name, o.grouping.id) < position),
        }
    }
}
