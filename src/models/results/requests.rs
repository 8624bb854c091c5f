use rust_decimal::Decimal;
use serde::Deserialize;
use ts_rs::TS;

use crate::models::results::entities::{ExtraMarkUnit, TransitionAction};

/// 更新分项分数请求
///
/// `markable_key` 形如 `"RubricCriterion-12"`；`mark` 为 `null` 时清除分数。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct UpdateMarkRequest {
    pub markable_key: String,
    #[ts(type = "number | boolean | string | null")]
    pub mark: serde_json::Value,
    /// 给出时 `num_marked` 只统计分配给该阅卷人的小组
    pub grader_id: Option<i64>,
}

/// 查看结果的查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultViewQuery {
    pub grader_id: Option<i64>,
}

/// 添加附加分请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct AddExtraMarkRequest {
    #[ts(type = "number")]
    pub extra_mark: Decimal,
    #[serde(default)]
    pub unit: ExtraMarkUnit,
    pub description: Option<String>,
}

/// 批量发布/撤回请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ReleaseRequest {
    pub result_ids: Vec<i64>,
    pub released: bool,
}

/// 状态迁移请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct TransitionRequest {
    pub action: TransitionAction,
}

/// 复评申请
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct RemarkRequest {
    pub text: Option<String>,
}

/// 更新总评请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct OverallCommentRequest {
    pub overall_comment: Option<String>,
}
