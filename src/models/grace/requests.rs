use serde::Deserialize;
use ts_rs::TS;

/// 添加宽限期扣除请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grace.ts")]
pub struct AddGraceDeductionRequest {
    pub membership_id: i64,
    pub deduction: i32,
}
