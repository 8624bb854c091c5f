use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

use crate::models::annotations::entities::{Annotation, AnnotationCategory};
use crate::models::grace::entities::GracePeriodDeduction;
use crate::models::results::entities::{
    ExtraMark, GradingResult, Mark, MarkTotals, ResultStatus,
};
use crate::models::tags::entities::Tag;

/// 分项分数更新响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct MarkUpdateResponse {
    pub mark: Mark,
    #[ts(type = "number")]
    pub total_mark: Decimal,
    #[ts(type = "number")]
    pub total_possible: Decimal,
    pub num_marked: usize,
}

/// 总分响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct TotalResponse {
    pub result_id: i64,
    pub totals: MarkTotals,
}

/// 单个评分标准在结果视图中的展示
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct MarkView {
    pub criterion_id: i64,
    pub criterion_name: String,
    #[ts(type = "number | null")]
    pub mark: Option<Decimal>,
    #[ts(type = "number | null")]
    pub score: Option<Decimal>,
    #[ts(type = "number")]
    pub max_mark: Decimal,
    #[ts(type = "number")]
    pub deduction: Decimal,
}

/// 结果视图（JSON 契约）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultView {
    pub result: GradingResult,
    pub status: ResultStatus,
    pub submission_id: i64,
    pub grouping_id: i64,
    pub group_name: String,
    /// 以 `"<CriterionType>-<id>"` 为键
    pub marks: BTreeMap<String, MarkView>,
    /// 查看复评结果时附带原始批改的分数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_marks: Option<BTreeMap<String, MarkView>>,
    /// 评分标准按阅卷人分配时，当前阅卷人负责的标准键
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_criteria: Option<Vec<String>>,
    pub extra_marks: Vec<ExtraMark>,
    pub totals: MarkTotals,
    pub annotation_categories: Vec<AnnotationCategory>,
    pub annotations: Vec<Annotation>,
    pub grace_period_deductions: Vec<GracePeriodDeduction>,
    pub tags: Vec<Tag>,
}
