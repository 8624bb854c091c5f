//! 阅卷人分配范围

use std::collections::HashSet;

use crate::models::criteria::entities::Criterion;
use crate::models::graders::entities::GraderAssignment;

/// 一个阅卷人在某个作业中可见的小组与评分标准
#[derive(Debug, Clone, Default)]
pub struct GraderScope {
    grouping_ids: HashSet<i64>,
    criterion_ids: HashSet<i64>,
}

impl GraderScope {
    pub fn new(assignment: &GraderAssignment) -> Self {
        Self {
            grouping_ids: assignment.grouping_ids.iter().copied().collect(),
            criterion_ids: assignment.criterion_ids.iter().copied().collect(),
        }
    }

    pub fn covers_grouping(&self, grouping_id: i64) -> bool {
        self.grouping_ids.contains(&grouping_id)
    }

    pub fn covers_criterion(&self, criterion_id: i64) -> bool {
        self.criterion_ids.contains(&criterion_id)
    }

    /// 按评分标准原有顺序列出负责的标准键
    pub fn assigned_keys(&self, criteria: &[Criterion]) -> Vec<String> {
        criteria
            .iter()
            .filter(|c| self.covers_criterion(c.id))
            .map(|c| c.markable_key().to_string())
            .collect()
    }
}
