use serde::Serialize;
use ts_rs::TS;

use crate::models::grace::entities::GracePeriodDeduction;

/// 宽限期扣除列表
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grace.ts")]
pub struct GraceDeductionList {
    pub items: Vec<GracePeriodDeduction>,
    pub total_units: i64,
}
