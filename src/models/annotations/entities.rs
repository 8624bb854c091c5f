use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

/// 批注文本；仅当所属分类关联了 flexible 评分标准时扣分才生效
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/annotation.ts")]
pub struct AnnotationText {
    pub id: i64,
    pub annotation_category_id: Option<i64>,
    pub content: String,
    #[ts(type = "number | null")]
    pub deduction: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/annotation.ts")]
pub struct AnnotationCategory {
    pub id: i64,
    pub assignment_id: i64,
    pub annotation_category_name: String,
    pub flexible_criterion_id: Option<i64>,
    pub position: i32,
    pub texts: Vec<AnnotationText>,
}

/// 附着在某次批改上的批注
///
/// `criterion_id` 与 `deduction` 由存储层根据批注文本及分类展开，
/// 用于计算扣分台账。
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/annotation.ts")]
pub struct Annotation {
    pub id: i64,
    pub result_id: i64,
    pub annotation_text_id: i64,
    pub submission_file: String,
    pub line_start: i32,
    pub line_end: i32,
    pub annotation_number: i32,
    pub content: String,
    pub criterion_id: Option<i64>,
    #[ts(type = "number | null")]
    pub deduction: Option<Decimal>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Annotation {
    /// 实际生效的扣分（无关联评分标准或无扣分时为 None）
    pub fn effective_deduction(&self) -> Option<(i64, Decimal)> {
        match (self.criterion_id, self.deduction) {
            (Some(criterion_id), Some(d)) if d > Decimal::ZERO => Some((criterion_id, d)),
            _ => None,
        }
    }
}
