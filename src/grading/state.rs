//! 批改状态机
//!
//! 所有针对单个结果的写操作都先经过这里校验，得到一个 `ResultMutation`，
//! 再由存储层在同一事务中执行并重算总分。

use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::{MarkingError, Result};
use crate::models::criteria::entities::MarkableKey;
use crate::models::results::entities::{
    ExtraMarkUnit, GradingResult, MarkingState, ResultSnapshot, ResultStatus, TransitionAction,
};
use crate::models::results::mutations::ResultMutation;

/// 附加分的取值上限（绝对值）
pub const MAX_EXTRA_POINTS: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
pub const MAX_EXTRA_PERCENTAGE: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

pub struct ResultStateMachine;

impl ResultStateMachine {
    /// 单个结果自身的展示状态（不考虑复评序列）
    pub fn status(result: &GradingResult) -> ResultStatus {
        if result.released_to_students {
            ResultStatus::Released
        } else if result.is_complete() {
            ResultStatus::Complete
        } else {
            ResultStatus::InProgress
        }
    }

    /// 只有未完成的结果可以修改分数、附加分、批注与总评
    pub fn ensure_editable(result: &GradingResult) -> Result<()> {
        if result.released_to_students {
            return Err(MarkingError::invalid_transition(format!(
                "Result {} is released and cannot be edited",
                result.id
            )));
        }
        if result.is_complete() {
            return Err(MarkingError::invalid_transition(format!(
                "Result {} is complete and cannot be edited",
                result.id
            )));
        }
        Ok(())
    }

    /// 切换完成状态对应的动作
    pub fn toggle_action(result: &GradingResult) -> TransitionAction {
        match result.marking_state {
            MarkingState::Incomplete => TransitionAction::Complete,
            MarkingState::Complete => TransitionAction::Reopen,
        }
    }

    pub fn plan(snapshot: &ResultSnapshot, action: TransitionAction) -> Result<ResultMutation> {
        let result = &snapshot.result;
        debug!("Planning {} on result {}", action, result.id);

        match action {
            TransitionAction::Complete => {
                if result.is_complete() {
                    return Err(MarkingError::invalid_transition(format!(
                        "Result {} is already complete",
                        result.id
                    )));
                }
                if snapshot.graded_count() == 0 && !result.has_comment() {
                    return Err(MarkingError::invalid_transition(format!(
                        "Result {} has no graded marks and no overall comment",
                        result.id
                    )));
                }
                Ok(ResultMutation::SetMarkingState(MarkingState::Complete))
            }
            TransitionAction::Reopen => {
                if result.released_to_students {
                    return Err(MarkingError::invalid_transition(format!(
                        "Result {} is released; unrelease it before reopening",
                        result.id
                    )));
                }
                if !result.is_complete() {
                    return Err(MarkingError::invalid_transition(format!(
                        "Result {} is already in progress",
                        result.id
                    )));
                }
                Ok(ResultMutation::SetMarkingState(MarkingState::Incomplete))
            }
            TransitionAction::Release => {
                if !result.is_complete() {
                    return Err(MarkingError::not_ready(format!(
                        "Result {} is not complete",
                        result.id
                    )));
                }
                if result.released_to_students {
                    return Ok(ResultMutation::None);
                }
                Ok(ResultMutation::SetReleased(true))
            }
            TransitionAction::Unrelease => {
                if result.released_to_students {
                    Ok(ResultMutation::SetReleased(false))
                } else {
                    Ok(ResultMutation::None)
                }
            }
            TransitionAction::RequestRemark | TransitionAction::CancelRemark => {
                Err(MarkingError::invalid_transition(format!(
                    "{action} applies to a submission, not to result {}",
                    result.id
                )))
            }
        }
    }

    pub fn plan_toggle(snapshot: &ResultSnapshot) -> Result<ResultMutation> {
        Self::plan(snapshot, Self::toggle_action(&snapshot.result))
    }

    pub fn plan_mark(
        snapshot: &ResultSnapshot,
        key: MarkableKey,
        value: &serde_json::Value,
    ) -> Result<ResultMutation> {
        Self::ensure_editable(&snapshot.result)?;

        let criterion = snapshot.criterion(key.criterion_id).ok_or_else(|| {
            MarkingError::not_found(format!(
                "Criterion {} not found for result {}",
                key, snapshot.result.id
            ))
        })?;
        if criterion.criterion_type() != key.criterion_type {
            return Err(MarkingError::validation(format!(
                "Criterion {} is a {}, not a {}",
                criterion.id,
                criterion.criterion_type(),
                key.criterion_type
            )));
        }

        let raw = criterion.kind.scorer().decode_json(value)?;
        Ok(ResultMutation::SetMark {
            criterion_id: criterion.id,
            criterion_type: key.criterion_type,
            mark: raw.map(|r| r.to_stored()),
        })
    }

    pub fn plan_add_extra_mark(
        snapshot: &ResultSnapshot,
        extra_mark: Decimal,
        unit: ExtraMarkUnit,
        description: Option<String>,
    ) -> Result<ResultMutation> {
        Self::ensure_editable(&snapshot.result)?;
        let limit = match unit {
            ExtraMarkUnit::Points => MAX_EXTRA_POINTS,
            ExtraMarkUnit::Percentage => MAX_EXTRA_PERCENTAGE,
        };
        if extra_mark.abs() > limit {
            return Err(MarkingError::out_of_range(format!(
                "Extra mark {extra_mark} is outside [-{limit}, {limit}]"
            )));
        }
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Ok(ResultMutation::AddExtraMark {
            extra_mark,
            unit,
            description,
        })
    }

    pub fn plan_remove_extra_mark(
        snapshot: &ResultSnapshot,
        extra_mark_id: i64,
    ) -> Result<ResultMutation> {
        Self::ensure_editable(&snapshot.result)?;
        if snapshot.extra_mark(extra_mark_id).is_none() {
            return Err(MarkingError::not_found(format!(
                "Extra mark {extra_mark_id} not found"
            )));
        }
        Ok(ResultMutation::RemoveExtraMark { extra_mark_id })
    }

    pub fn plan_overall_comment(
        snapshot: &ResultSnapshot,
        comment: Option<String>,
    ) -> Result<ResultMutation> {
        Self::ensure_editable(&snapshot.result)?;
        Ok(ResultMutation::SetOverallComment(comment))
    }

    pub fn plan_add_annotation(
        snapshot: &ResultSnapshot,
        annotation_text_id: i64,
        submission_file: &str,
        line_start: i32,
        line_end: i32,
    ) -> Result<ResultMutation> {
        Self::ensure_editable(&snapshot.result)?;
        let submission_file = submission_file.trim();
        if submission_file.is_empty() {
            return Err(MarkingError::validation("Annotation file path is empty"));
        }
        if line_start < 1 || line_end < line_start {
            return Err(MarkingError::validation(format!(
                "Invalid line range {line_start}..{line_end}"
            )));
        }
        Ok(ResultMutation::AddAnnotation {
            annotation_text_id,
            submission_file: submission_file.to_string(),
            line_start,
            line_end,
        })
    }

    pub fn plan_remove_annotation(
        snapshot: &ResultSnapshot,
        annotation_id: i64,
    ) -> Result<ResultMutation> {
        Self::ensure_editable(&snapshot.result)?;
        if !snapshot.annotations.iter().any(|a| a.id == annotation_id) {
            return Err(MarkingError::not_found(format!(
                "Annotation {annotation_id} not found"
            )));
        }
        Ok(ResultMutation::RemoveAnnotation { annotation_id })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::grading::aggregate::tests::{flexible_criterion, mark, rubric_criterion};
    use crate::models::criteria::entities::CriterionType;
    use rust_decimal_macros::dec;
    use serde_json::json;

    pub(crate) fn result(state: MarkingState, released: bool) -> GradingResult {
        let now = chrono::Utc::now();
        GradingResult {
            id: 1,
            submission_id: 1,
            marking_state: state,
            total_mark: Decimal::ZERO,
            overall_comment: None,
            released_to_students: released,
            is_remark: false,
            remark_request_timestamp: None,
            remark_request_text: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn snapshot(state: MarkingState, released: bool, graded: bool) -> ResultSnapshot {
        let flexible = flexible_criterion(2, dec!(10));
        let rubric = rubric_criterion(1);
        let marks = if graded {
            vec![mark(1, &flexible, Some(dec!(5)))]
        } else {
            vec![mark(1, &flexible, None)]
        };
        ResultSnapshot {
            result: result(state, released),
            assignment_id: 1,
            grouping_id: 1,
            criteria: vec![rubric, flexible],
            marks,
            extra_marks: vec![],
            annotations: vec![],
        }
    }

    #[test]
    fn test_complete_empty_result_is_invalid() {
        let snap = snapshot(MarkingState::Incomplete, false, false);
        assert!(matches!(
            ResultStateMachine::plan(&snap, TransitionAction::Complete),
            Err(MarkingError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_complete_with_only_orphaned_marks_is_invalid() {
        let mut snap = snapshot(MarkingState::Incomplete, false, true);
        // 评分标准已被删除，分项仍留在结果上
        snap.criteria.retain(|c| c.id != 2);
        assert!(matches!(
            ResultStateMachine::plan(&snap, TransitionAction::Complete),
            Err(MarkingError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_complete_with_comment_only() {
        let mut snap = snapshot(MarkingState::Incomplete, false, false);
        snap.result.overall_comment = Some("Good work".to_string());
        assert_eq!(
            ResultStateMachine::plan(&snap, TransitionAction::Complete).unwrap(),
            ResultMutation::SetMarkingState(MarkingState::Complete)
        );

        // 空白总评不算
        snap.result.overall_comment = Some("   ".to_string());
        assert!(ResultStateMachine::plan(&snap, TransitionAction::Complete).is_err());
    }

    #[test]
    fn test_toggle_flips_between_states() {
        let snap = snapshot(MarkingState::Incomplete, false, true);
        assert_eq!(
            ResultStateMachine::plan_toggle(&snap).unwrap(),
            ResultMutation::SetMarkingState(MarkingState::Complete)
        );
        let snap = snapshot(MarkingState::Complete, false, true);
        assert_eq!(
            ResultStateMachine::plan_toggle(&snap).unwrap(),
            ResultMutation::SetMarkingState(MarkingState::Incomplete)
        );
    }

    #[test]
    fn test_toggle_released_result_is_invalid() {
        let snap = snapshot(MarkingState::Complete, true, true);
        assert!(matches!(
            ResultStateMachine::plan_toggle(&snap),
            Err(MarkingError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_release_requires_complete() {
        let snap = snapshot(MarkingState::Incomplete, false, true);
        assert!(matches!(
            ResultStateMachine::plan(&snap, TransitionAction::Release),
            Err(MarkingError::NotReady(_))
        ));

        let snap = snapshot(MarkingState::Complete, false, true);
        assert_eq!(
            ResultStateMachine::plan(&snap, TransitionAction::Release).unwrap(),
            ResultMutation::SetReleased(true)
        );

        let snap = snapshot(MarkingState::Complete, true, true);
        assert_eq!(
            ResultStateMachine::plan(&snap, TransitionAction::Release).unwrap(),
            ResultMutation::None
        );
    }

    #[test]
    fn test_unrelease_is_idempotent() {
        let snap = snapshot(MarkingState::Complete, true, true);
        assert_eq!(
            ResultStateMachine::plan(&snap, TransitionAction::Unrelease).unwrap(),
            ResultMutation::SetReleased(false)
        );
        let snap = snapshot(MarkingState::Complete, false, true);
        assert_eq!(
            ResultStateMachine::plan(&snap, TransitionAction::Unrelease).unwrap(),
            ResultMutation::None
        );
    }

    #[test]
    fn test_remark_actions_are_not_result_level() {
        let snap = snapshot(MarkingState::Complete, true, true);
        assert!(matches!(
            ResultStateMachine::plan(&snap, TransitionAction::RequestRemark),
            Err(MarkingError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_editing_guard() {
        let snap = snapshot(MarkingState::Complete, false, true);
        let key = MarkableKey::new(CriterionType::Flexible, 2);
        assert!(matches!(
            ResultStateMachine::plan_mark(&snap, key, &json!(3)),
            Err(MarkingError::InvalidTransition(_))
        ));
        assert!(matches!(
            ResultStateMachine::plan_add_extra_mark(&snap, dec!(1), ExtraMarkUnit::Points, None),
            Err(MarkingError::InvalidTransition(_))
        ));
        assert!(matches!(
            ResultStateMachine::plan_overall_comment(&snap, Some("x".into())),
            Err(MarkingError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_plan_mark_checks_key_and_range() {
        let snap = snapshot(MarkingState::Incomplete, false, false);

        let key = MarkableKey::new(CriterionType::Flexible, 2);
        assert_eq!(
            ResultStateMachine::plan_mark(&snap, key, &json!(7.5)).unwrap(),
            ResultMutation::SetMark {
                criterion_id: 2,
                criterion_type: CriterionType::Flexible,
                mark: Some(dec!(7.5)),
            }
        );
        assert!(matches!(
            ResultStateMachine::plan_mark(&snap, key, &json!(11)),
            Err(MarkingError::OutOfRange(_))
        ));

        let wrong_type = MarkableKey::new(CriterionType::Checkbox, 2);
        assert!(matches!(
            ResultStateMachine::plan_mark(&snap, wrong_type, &json!(true)),
            Err(MarkingError::Validation(_))
        ));

        let missing = MarkableKey::new(CriterionType::Rubric, 99);
        assert!(matches!(
            ResultStateMachine::plan_mark(&snap, missing, &json!(1)),
            Err(MarkingError::NotFound(_))
        ));

        let rubric = MarkableKey::new(CriterionType::Rubric, 1);
        assert_eq!(
            ResultStateMachine::plan_mark(&snap, rubric, &json!(null)).unwrap(),
            ResultMutation::SetMark {
                criterion_id: 1,
                criterion_type: CriterionType::Rubric,
                mark: None,
            }
        );
    }

    #[test]
    fn test_remove_unknown_extra_mark() {
        let snap = snapshot(MarkingState::Incomplete, false, false);
        assert!(matches!(
            ResultStateMachine::plan_remove_extra_mark(&snap, 5),
            Err(MarkingError::NotFound(_))
        ));
    }

    #[test]
    fn test_annotation_line_range_validation() {
        let snap = snapshot(MarkingState::Incomplete, false, false);
        assert!(ResultStateMachine::plan_add_annotation(&snap, 1, "a.c", 3, 2).is_err());
        assert!(ResultStateMachine::plan_add_annotation(&snap, 1, " ", 1, 2).is_err());
        assert!(ResultStateMachine::plan_add_annotation(&snap, 1, "a.c", 1, 1).is_ok());
    }

    #[test]
    fn test_extra_mark_magnitude_is_bounded() {
        let snap = snapshot(MarkingState::Incomplete, false, true);
        assert!(matches!(
            ResultStateMachine::plan_add_extra_mark(
                &snap,
                Decimal::MAX,
                ExtraMarkUnit::Points,
                None
            ),
            Err(MarkingError::OutOfRange(_))
        ));
        assert!(matches!(
            ResultStateMachine::plan_add_extra_mark(
                &snap,
                dec!(-1001),
                ExtraMarkUnit::Percentage,
                None
            ),
            Err(MarkingError::OutOfRange(_))
        ));
        assert!(
            ResultStateMachine::plan_add_extra_mark(
                &snap,
                dec!(-1000000),
                ExtraMarkUnit::Points,
                Some("  ".to_string())
            )
            .is_ok()
        );
    }
}
