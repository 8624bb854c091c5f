use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::MarkingError;
use crate::models::annotations::entities::Annotation;
use crate::models::criteria::entities::{Criterion, CriterionType, MarkableKey};

// 持久化的批改状态；“已发布”由 released_to_students 单独表示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub enum MarkingState {
    Incomplete,
    Complete,
}

impl MarkingState {
    pub const INCOMPLETE: &'static str = "incomplete";
    pub const COMPLETE: &'static str = "complete";
}

impl std::fmt::Display for MarkingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkingState::Incomplete => write!(f, "{}", Self::INCOMPLETE),
            MarkingState::Complete => write!(f, "{}", Self::COMPLETE),
        }
    }
}

impl std::str::FromStr for MarkingState {
    type Err = MarkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::INCOMPLETE => Ok(MarkingState::Incomplete),
            Self::COMPLETE => Ok(MarkingState::Complete),
            _ => Err(MarkingError::validation(format!(
                "Invalid marking state: {s}"
            ))),
        }
    }
}

// 对外展示的批改状态（由结果序列推导，不持久化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub enum ResultStatus {
    NotCollected,
    InProgress,
    Complete,
    Released,
    RemarkRequested,
}

/// 状态机动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub enum TransitionAction {
    Complete,
    Reopen,
    Release,
    Unrelease,
    RequestRemark,
    CancelRemark,
}

impl std::fmt::Display for TransitionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransitionAction::Complete => "complete",
            TransitionAction::Reopen => "reopen",
            TransitionAction::Release => "release",
            TransitionAction::Unrelease => "unrelease",
            TransitionAction::RequestRemark => "request_remark",
            TransitionAction::CancelRemark => "cancel_remark",
        };
        write!(f, "{name}")
    }
}

/// 一次批改
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct GradingResult {
    pub id: i64,
    pub submission_id: i64,
    pub marking_state: MarkingState,
    // 派生值，任何时候都可由分项、附加分与扣分重新计算
    #[ts(type = "number")]
    pub total_mark: Decimal,
    pub overall_comment: Option<String>,
    pub released_to_students: bool,
    pub is_remark: bool,
    pub remark_request_timestamp: Option<chrono::DateTime<chrono::Utc>>,
    pub remark_request_text: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl GradingResult {
    pub fn is_complete(&self) -> bool {
        self.marking_state == MarkingState::Complete
    }

    pub fn has_comment(&self) -> bool {
        self.overall_comment
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

/// 分项分数；`mark` 保存原始输入（等级序号 / 分值 / 0-1），未评时为 None
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct Mark {
    pub id: i64,
    pub result_id: i64,
    pub markable_id: i64,
    pub markable_type: CriterionType,
    #[ts(type = "number | null")]
    pub mark: Option<Decimal>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Mark {
    pub fn markable_key(&self) -> MarkableKey {
        MarkableKey::new(self.markable_type, self.markable_id)
    }

    pub fn is_graded(&self) -> bool {
        self.mark.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub enum ExtraMarkUnit {
    Points,
    Percentage,
}

impl Default for ExtraMarkUnit {
    fn default() -> Self {
        ExtraMarkUnit::Points
    }
}

impl ExtraMarkUnit {
    pub const POINTS: &'static str = "points";
    pub const PERCENTAGE: &'static str = "percentage";
}

impl std::fmt::Display for ExtraMarkUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtraMarkUnit::Points => write!(f, "{}", Self::POINTS),
            ExtraMarkUnit::Percentage => write!(f, "{}", Self::PERCENTAGE),
        }
    }
}

impl std::str::FromStr for ExtraMarkUnit {
    type Err = MarkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::POINTS => Ok(ExtraMarkUnit::Points),
            Self::PERCENTAGE => Ok(ExtraMarkUnit::Percentage),
            _ => Err(MarkingError::validation(format!(
                "Invalid extra mark unit: {s}"
            ))),
        }
    }
}

/// 附加分（可为负，作为罚分）
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ExtraMark {
    pub id: i64,
    pub result_id: i64,
    #[ts(type = "number")]
    pub extra_mark: Decimal,
    pub unit: ExtraMarkUnit,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 汇总结果
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct MarkTotals {
    #[ts(type = "number")]
    pub total_mark: Decimal,
    #[ts(type = "number")]
    pub total_possible: Decimal,
    #[ts(type = "number")]
    pub criteria_total: Decimal,
    #[ts(type = "number")]
    pub extra_total: Decimal,
    #[ts(type = "number")]
    pub percentage: Decimal,
    pub graded_count: usize,
}

/// 在同一事务中读取到的一次批改的完整上下文
#[derive(Debug, Clone)]
pub struct ResultSnapshot {
    pub result: GradingResult,
    pub assignment_id: i64,
    pub grouping_id: i64,
    pub criteria: Vec<Criterion>,
    pub marks: Vec<Mark>,
    pub extra_marks: Vec<ExtraMark>,
    pub annotations: Vec<Annotation>,
}

impl ResultSnapshot {
    pub fn criterion(&self, criterion_id: i64) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id == criterion_id)
    }

    pub fn mark_for(&self, criterion_id: i64) -> Option<&Mark> {
        self.marks.iter().find(|m| m.markable_id == criterion_id)
    }

    pub fn extra_mark(&self, extra_mark_id: i64) -> Option<&ExtraMark> {
        self.extra_marks.iter().find(|e| e.id == extra_mark_id)
    }

    /// 只统计能对应到现有评分标准的已评分项
    pub fn graded_count(&self) -> usize {
        self.marks
            .iter()
            .filter(|m| m.is_graded() && self.criterion(m.markable_id).is_some())
            .count()
    }
}
