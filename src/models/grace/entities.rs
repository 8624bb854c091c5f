use serde::Serialize;
use ts_rs::TS;

/// 宽限期扣除记录（按成员计）
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grace.ts")]
pub struct GracePeriodDeduction {
    pub id: i64,
    pub membership_id: i64,
    pub student_id: i64,
    pub grouping_id: i64,
    pub deduction: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
