//! 总分汇总
//!
//! 总分从分项、附加分与批注扣分完整重算，从不增量修改。

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::errors::{MarkingError, Result};
use crate::grading::deduction::DeductionLedger;
use crate::models::criteria::entities::Criterion;
use crate::models::results::entities::{
    ExtraMark, ExtraMarkUnit, Mark, MarkTotals, ResultSnapshot,
};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn overflow(what: &str) -> MarkingError {
    MarkingError::out_of_range(format!("{what} exceeds the supported numeric range"))
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>, what: &str) -> Result<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| overflow(what))
}

pub struct MarkAggregator;

impl MarkAggregator {
    /// 单个分项扣分后的得分；未评或分数已失效时返回 None
    pub fn criterion_contribution(
        criterion: &Criterion,
        mark: &Mark,
        ledger: &DeductionLedger,
    ) -> Option<Decimal> {
        let stored = mark.mark?;
        if mark.markable_type != criterion.criterion_type() {
            warn!(
                "Mark {} refers to {} but criterion {} is {}, counted as 0",
                mark.id,
                mark.markable_type,
                criterion.id,
                criterion.criterion_type()
            );
            return Some(Decimal::ZERO);
        }
        match criterion.kind.score_stored(stored) {
            Ok(score) => Some(ledger.apply_to(criterion.id, score)),
            Err(e) => {
                warn!(
                    "Stored mark {} for criterion {} no longer scores ({}), counted as 0",
                    stored, criterion.id, e
                );
                Some(Decimal::ZERO)
            }
        }
    }

    pub fn total_possible(criteria: &[Criterion]) -> Result<Decimal> {
        checked_sum(criteria.iter().map(|c| c.kind.max_score()), "Total possible mark")
    }

    /// 附加分贡献；百分比附加分依赖已确定的满分
    pub fn extra_contribution(extra: &ExtraMark, total_possible: Decimal) -> Result<Decimal> {
        match extra.unit {
            ExtraMarkUnit::Points => Ok(extra.extra_mark),
            ExtraMarkUnit::Percentage => extra
                .extra_mark
                .checked_div(HUNDRED)
                .and_then(|ratio| ratio.checked_mul(total_possible))
                .ok_or_else(|| overflow("Percentage extra mark")),
        }
    }

    /// 满分 × 百分比换算，满分为 0 时为 0
    pub fn percentage_of(total_mark: Decimal, total_possible: Decimal) -> Result<Decimal> {
        if total_possible <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        total_mark
            .checked_div(total_possible)
            .and_then(|ratio| ratio.checked_mul(HUNDRED))
            .map(|p| p.round_dp(2).normalize())
            .ok_or_else(|| overflow("Percentage"))
    }

    pub fn recompute(
        criteria: &[Criterion],
        marks: &[Mark],
        extra_marks: &[ExtraMark],
        ledger: &DeductionLedger,
    ) -> Result<MarkTotals> {
        let total_possible = Self::total_possible(criteria)?;

        let mut contributions = Vec::with_capacity(marks.len());
        for mark in marks.iter().filter(|m| m.is_graded()) {
            match criteria.iter().find(|c| c.id == mark.markable_id) {
                Some(criterion) => contributions
                    .push(Self::criterion_contribution(criterion, mark, ledger).unwrap_or_default()),
                None => warn!(
                    "Mark {} refers to missing criterion {}, ignored",
                    mark.id, mark.markable_id
                ),
            }
        }
        // 只计入能对应到现有评分标准的分项
        let graded_count = contributions.len();
        let criteria_total = checked_sum(contributions, "Criteria total")?;

        let extras = extra_marks
            .iter()
            .map(|extra| Self::extra_contribution(extra, total_possible))
            .collect::<Result<Vec<_>>>()?;
        let extra_total = checked_sum(extras.iter().copied(), "Extra mark total")?;
        let bonus_cap = checked_sum(
            extras.iter().copied().filter(|v| *v > Decimal::ZERO),
            "Bonus total",
        )?;

        let ceiling = total_possible
            .checked_add(bonus_cap)
            .ok_or_else(|| overflow("Mark ceiling"))?;
        let total_mark = criteria_total
            .checked_add(extra_total)
            .ok_or_else(|| overflow("Total mark"))?
            .max(Decimal::ZERO)
            .min(ceiling)
            .normalize();

        let percentage = Self::percentage_of(total_mark, total_possible)?;

        debug!(
            "Recomputed total {} / {} (criteria {}, extra {}, graded {})",
            total_mark, total_possible, criteria_total, extra_total, graded_count
        );

        Ok(MarkTotals {
            total_mark,
            total_possible: total_possible.normalize(),
            criteria_total: criteria_total.normalize(),
            extra_total: extra_total.normalize(),
            percentage,
            graded_count,
        })
    }

    pub fn recompute_snapshot(snapshot: &ResultSnapshot) -> Result<MarkTotals> {
        let ledger = DeductionLedger::from_annotations(&snapshot.annotations);
        Self::recompute(
            &snapshot.criteria,
            &snapshot.marks,
            &snapshot.extra_marks,
            &ledger,
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::annotations::entities::Annotation;
    use crate::models::criteria::entities::{
        CheckboxCriterion, CriterionKind, CriterionType, FlexibleCriterion, RubricCriterion,
        RubricLevel,
    };
    use rust_decimal_macros::dec;

    pub(crate) fn rubric_criterion(id: i64) -> Criterion {
        Criterion {
            id,
            assignment_id: 1,
            name: "Style".to_string(),
            position: 0,
            kind: CriterionKind::Rubric(RubricCriterion {
                weight: dec!(1),
                levels: (0..5)
                    .map(|i| RubricLevel {
                        name: format!("Level {i}"),
                        weight: Decimal::from(i),
                    })
                    .collect(),
            }),
        }
    }

    pub(crate) fn flexible_criterion(id: i64, max: Decimal) -> Criterion {
        Criterion {
            id,
            assignment_id: 1,
            name: "Correctness".to_string(),
            position: 1,
            kind: CriterionKind::Flexible(FlexibleCriterion { max_mark: max }),
        }
    }

    pub(crate) fn mark(id: i64, criterion: &Criterion, value: Option<Decimal>) -> Mark {
        Mark {
            id,
            result_id: 1,
            markable_id: criterion.id,
            markable_type: criterion.criterion_type(),
            mark: value,
            updated_at: chrono::Utc::now(),
        }
    }

    pub(crate) fn extra(id: i64, value: Decimal, unit: ExtraMarkUnit) -> ExtraMark {
        ExtraMark {
            id,
            result_id: 1,
            extra_mark: value,
            unit,
            description: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn deduction(id: i64, criterion_id: i64, amount: Decimal) -> Annotation {
        Annotation {
            id,
            result_id: 1,
            annotation_text_id: id,
            submission_file: "a.py".to_string(),
            line_start: 1,
            line_end: 1,
            annotation_number: id as i32,
            content: "off by one".to_string(),
            criterion_id: Some(criterion_id),
            deduction: Some(amount),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_rubric_flexible_and_percentage_extra() {
        let rubric = rubric_criterion(1);
        let flexible = flexible_criterion(2, dec!(10));
        let criteria = vec![rubric.clone(), flexible.clone()];
        let marks = vec![
            mark(1, &rubric, Some(dec!(2))),
            mark(2, &flexible, Some(dec!(7))),
        ];
        let extras = vec![extra(1, dec!(10), ExtraMarkUnit::Percentage)];

        let totals =
            MarkAggregator::recompute(&criteria, &marks, &extras, &DeductionLedger::default())
                .unwrap();
        assert_eq!(totals.total_possible, dec!(14));
        assert_eq!(totals.criteria_total, dec!(9));
        assert_eq!(totals.extra_total, dec!(1.4));
        assert_eq!(totals.total_mark, dec!(10.4));
        assert_eq!(totals.graded_count, 2);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let flexible = flexible_criterion(2, dec!(10));
        let criteria = vec![flexible.clone()];
        let marks = vec![mark(1, &flexible, Some(dec!(3.3)))];
        let extras = vec![extra(1, dec!(-1), ExtraMarkUnit::Points)];
        let ledger = DeductionLedger::default();

        let first = MarkAggregator::recompute(&criteria, &marks, &extras, &ledger).unwrap();
        let second = MarkAggregator::recompute(&criteria, &marks, &extras, &ledger).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.total_mark, dec!(2.3));
    }

    #[test]
    fn test_extra_mark_order_does_not_matter() {
        let flexible = flexible_criterion(2, dec!(20));
        let criteria = vec![flexible.clone()];
        let marks = vec![mark(1, &flexible, Some(dec!(12)))];
        let mut extras = vec![
            extra(1, dec!(2), ExtraMarkUnit::Points),
            extra(2, dec!(-5), ExtraMarkUnit::Percentage),
            extra(3, dec!(0.5), ExtraMarkUnit::Points),
        ];
        let ledger = DeductionLedger::default();

        let forward = MarkAggregator::recompute(&criteria, &marks, &extras, &ledger).unwrap();
        extras.reverse();
        let backward = MarkAggregator::recompute(&criteria, &marks, &extras, &ledger).unwrap();
        assert_eq!(forward.total_mark, backward.total_mark);
        assert_eq!(forward.total_mark, dec!(13.5));
    }

    #[test]
    fn test_nil_marks_excluded_from_graded_count() {
        let rubric = rubric_criterion(1);
        let flexible = flexible_criterion(2, dec!(10));
        let criteria = vec![rubric.clone(), flexible.clone()];
        let marks = vec![mark(1, &rubric, None), mark(2, &flexible, Some(dec!(4)))];

        let totals =
            MarkAggregator::recompute(&criteria, &marks, &[], &DeductionLedger::default())
                .unwrap();
        assert_eq!(totals.graded_count, 1);
        assert_eq!(totals.total_mark, dec!(4));
        assert_eq!(totals.percentage, dec!(28.57));
    }

    #[test]
    fn test_total_never_negative() {
        let flexible = flexible_criterion(2, dec!(10));
        let marks = vec![mark(1, &flexible, Some(dec!(1)))];
        let extras = vec![extra(1, dec!(-50), ExtraMarkUnit::Points)];

        let totals = MarkAggregator::recompute(
            &[flexible],
            &marks,
            &extras,
            &DeductionLedger::default(),
        )
        .unwrap();
        assert_eq!(totals.total_mark, Decimal::ZERO);
    }

    #[test]
    fn test_bonus_points_may_exceed_total_possible() {
        let flexible = flexible_criterion(2, dec!(10));
        let marks = vec![mark(1, &flexible, Some(dec!(10)))];
        let extras = vec![extra(1, dec!(3), ExtraMarkUnit::Points)];

        let totals = MarkAggregator::recompute(
            &[flexible],
            &marks,
            &extras,
            &DeductionLedger::default(),
        )
        .unwrap();
        assert_eq!(totals.total_mark, dec!(13));
        assert_eq!(totals.percentage, dec!(130));
    }

    #[test]
    fn test_annotation_deduction_floors_single_criterion() {
        let flexible = flexible_criterion(2, dec!(10));
        let other = flexible_criterion(3, dec!(5));
        let criteria = vec![flexible.clone(), other.clone()];
        let marks = vec![
            mark(1, &flexible, Some(dec!(3))),
            mark(2, &other, Some(dec!(5))),
        ];
        let ledger = DeductionLedger::from_annotations(&[
            deduction(1, 2, dec!(2)),
            deduction(2, 2, dec!(2)),
        ]);

        let totals = MarkAggregator::recompute(&criteria, &marks, &[], &ledger).unwrap();
        // 第一个标准扣至 0，不影响第二个标准
        assert_eq!(totals.criteria_total, dec!(5));
        assert_eq!(totals.total_mark, dec!(5));
    }

    #[test]
    fn test_stale_mark_counts_zero() {
        let rubric = rubric_criterion(1);
        let checkbox = Criterion {
            id: 4,
            assignment_id: 1,
            name: "Compiles".to_string(),
            position: 2,
            kind: CriterionKind::Checkbox(CheckboxCriterion { weight: dec!(1) }),
        };
        let criteria = vec![rubric.clone(), checkbox.clone()];
        let mut wrong_type = mark(2, &checkbox, Some(dec!(1)));
        wrong_type.markable_type = CriterionType::Flexible;
        let marks = vec![mark(1, &rubric, Some(dec!(9))), wrong_type];

        let totals =
            MarkAggregator::recompute(&criteria, &marks, &[], &DeductionLedger::default())
                .unwrap();
        assert_eq!(totals.total_mark, Decimal::ZERO);
        assert_eq!(totals.graded_count, 2);
        assert_eq!(totals.total_possible, dec!(5));
    }

    #[test]
    fn test_marks_of_missing_criteria_are_not_counted() {
        let flexible = flexible_criterion(2, dec!(10));
        let removed = flexible_criterion(9, dec!(10));
        let marks = vec![
            mark(1, &flexible, Some(dec!(4))),
            mark(2, &removed, Some(dec!(6))),
        ];

        let totals =
            MarkAggregator::recompute(&[flexible], &marks, &[], &DeductionLedger::default())
                .unwrap();
        assert_eq!(totals.graded_count, 1);
        assert_eq!(totals.total_mark, dec!(4));
    }

    #[test]
    fn test_overflowing_totals_are_out_of_range() {
        let flexible = flexible_criterion(2, Decimal::MAX);
        let other = flexible_criterion(3, Decimal::MAX);
        let criteria = vec![flexible.clone(), other.clone()];
        assert!(matches!(
            MarkAggregator::total_possible(&criteria),
            Err(MarkingError::OutOfRange(_))
        ));

        let small = flexible_criterion(4, dec!(10));
        let extras = vec![
            extra(1, Decimal::MAX, ExtraMarkUnit::Points),
            extra(2, Decimal::MAX, ExtraMarkUnit::Points),
        ];
        assert!(matches!(
            MarkAggregator::recompute(&[small], &[], &extras, &DeductionLedger::default()),
            Err(MarkingError::OutOfRange(_))
        ));
    }
}
