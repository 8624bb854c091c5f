//! 数据库浮点列与 `Decimal` 之间的转换

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::errors::{MarkingError, Result};

// 浮点列最多保留 6 位小数，避免 0.1 + 0.2 之类的尾差进入计算
const STORED_SCALE: u32 = 6;

/// 非有限值或超出 `Decimal` 范围的存量数据视为损坏
pub fn decimal_from_f64(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(MarkingError::database_operation(format!(
            "Stored value {value} is not a finite number"
        )));
    }
    Decimal::from_f64(value)
        .map(|d| d.round_dp(STORED_SCALE).normalize())
        .ok_or_else(|| {
            MarkingError::database_operation(format!(
                "Stored value {value} is outside the decimal range"
            ))
        })
}

pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_float_columns_become_exact_decimals() {
        assert_eq!(decimal_from_f64(10.4).unwrap(), dec!(10.4));
        assert_eq!(decimal_from_f64(0.1 + 0.2).unwrap(), dec!(0.3));
        assert_eq!(decimal_to_f64(dec!(7.25)), 7.25);
    }

    #[test]
    fn test_corrupt_float_columns_are_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e30, -1e300] {
            assert!(matches!(
                decimal_from_f64(value),
                Err(MarkingError::DatabaseOperation(_))
            ));
        }
    }
}
