//! 成绩分布统计

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::errors::{MarkingError, Result};
use crate::models::submissions::responses::GradeDistribution;

/// 区间数上限
pub const MAX_INTERVALS: usize = 100;

fn overflow() -> MarkingError {
    MarkingError::out_of_range("Grade statistics exceed the supported numeric range")
}

/// 将百分比分入 `intervals` 个等宽区间；100% 及以上落在最后一个区间
pub fn grade_distribution(percentages: &[Decimal], intervals: usize) -> Result<GradeDistribution> {
    if !(1..=MAX_INTERVALS).contains(&intervals) {
        return Err(MarkingError::validation(format!(
            "Interval count must be between 1 and {MAX_INTERVALS}"
        )));
    }

    let width = Decimal::ONE_HUNDRED / Decimal::from(intervals as u64);
    let mut buckets = vec![0usize; intervals];
    for p in percentages {
        let clamped = (*p).max(Decimal::ZERO);
        let index = (clamped / width).floor().to_usize().unwrap_or(usize::MAX);
        buckets[index.min(intervals - 1)] += 1;
    }

    let count = percentages.len();
    let average = if count == 0 {
        Decimal::ZERO
    } else {
        let sum = percentages
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(*p))
            .ok_or_else(overflow)?;
        (sum / Decimal::from(count as u64)).round_dp(2).normalize()
    };

    let median = {
        let mut sorted = percentages.to_vec();
        sorted.sort();
        let middle = match count {
            0 => Decimal::ZERO,
            n if n % 2 == 1 => sorted[n / 2],
            n => {
                sorted[n / 2 - 1]
                    .checked_add(sorted[n / 2])
                    .ok_or_else(overflow)?
                    / Decimal::TWO
            }
        };
        middle.round_dp(2).normalize()
    };

    Ok(GradeDistribution {
        buckets,
        count,
        average,
        median,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_buckets_and_boundaries() {
        let dist = grade_distribution(
            &[dec!(0), dec!(9.99), dec!(10), dec!(55), dec!(100), dec!(120)],
            10,
        )
        .unwrap();
        assert_eq!(dist.buckets, vec![2, 1, 0, 0, 0, 1, 0, 0, 0, 2]);
        assert_eq!(dist.count, 6);
    }

    #[test]
    fn test_average_and_median() {
        let dist = grade_distribution(&[dec!(40), dec!(90), dec!(70), dec!(60)], 4).unwrap();
        assert_eq!(dist.average, dec!(65));
        assert_eq!(dist.median, dec!(65));
        assert_eq!(dist.buckets, vec![0, 1, 2, 1]);
    }

    #[test]
    fn test_empty_and_invalid() {
        let dist = grade_distribution(&[], 5).unwrap();
        assert_eq!(dist.buckets, vec![0; 5]);
        assert_eq!(dist.average, Decimal::ZERO);
        assert!(grade_distribution(&[dec!(1)], 0).is_err());
    }

    #[test]
    fn test_interval_count_is_bounded() {
        assert!(matches!(
            grade_distribution(&[dec!(50)], usize::MAX),
            Err(MarkingError::Validation(_))
        ));
        assert!(matches!(
            grade_distribution(&[dec!(50)], MAX_INTERVALS + 1),
            Err(MarkingError::Validation(_))
        ));
        let dist = grade_distribution(&[dec!(50)], MAX_INTERVALS).unwrap();
        assert_eq!(dist.buckets.len(), MAX_INTERVALS);
        assert_eq!(dist.buckets[50], 1);
    }

    #[test]
    fn test_huge_percentages_are_out_of_range() {
        assert!(matches!(
            grade_distribution(&[Decimal::MAX, Decimal::MAX], 10),
            Err(MarkingError::OutOfRange(_))
        ));
    }
}
