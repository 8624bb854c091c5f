use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grader.ts")]
pub struct Grader {
    pub id: i64,
    pub user_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 阅卷人在一个作业中负责的小组与评分标准
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraderAssignment {
    pub grader_id: i64,
    pub grouping_ids: Vec<i64>,
    pub criterion_ids: Vec<i64>,
}
