//! 事务内变更指令
//!
//! 纯核心根据快照做出决策，返回一个变更指令；存储层在同一事务中执行它，
//! 随后重新计算总分。

use rust_decimal::Decimal;

use crate::models::criteria::entities::CriterionType;
use crate::models::results::entities::{
    ExtraMarkUnit, GradingResult, MarkTotals, MarkingState, ResultSnapshot,
};
use crate::models::submissions::entities::SubmissionContext;

#[derive(Debug, Clone, PartialEq)]
pub enum ResultMutation {
    /// 无需写入（例如重复发布），仍会重新计算总分
    None,
    SetMark {
        criterion_id: i64,
        criterion_type: CriterionType,
        mark: Option<Decimal>,
    },
    AddExtraMark {
        extra_mark: Decimal,
        unit: ExtraMarkUnit,
        description: Option<String>,
    },
    RemoveExtraMark {
        extra_mark_id: i64,
    },
    SetOverallComment(Option<String>),
    SetMarkingState(MarkingState),
    SetReleased(bool),
    AddAnnotation {
        annotation_text_id: i64,
        submission_file: String,
        line_start: i32,
        line_end: i32,
    },
    RemoveAnnotation {
        annotation_id: i64,
    },
}

/// 变更执行后新建或更新的行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedChange {
    None,
    Mark(i64),
    ExtraMark(i64),
    Annotation(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionMutation {
    None,
    /// 新建复评结果（空白、未完成）
    CreateRemark {
        requested_at: chrono::DateTime<chrono::Utc>,
        text: Option<String>,
    },
    /// 删除指定结果（撤销复评）
    DeleteResult(i64),
}

/// `mutate_result` 的执行结果：变更后的快照与重算的总分
#[derive(Debug, Clone)]
pub struct ResultMutationOutcome {
    pub change: AppliedChange,
    pub snapshot: ResultSnapshot,
    pub totals: MarkTotals,
}

/// `mutate_submission` 的执行结果
#[derive(Debug, Clone)]
pub struct SubmissionMutationOutcome {
    pub created: Option<GradingResult>,
    pub deleted: Option<i64>,
    pub context: SubmissionContext,
}
