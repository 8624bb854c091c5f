//! 评分标准打分
//!
//! 三种评分标准共享 `CriterionScorer` 能力接口，由 `CriterionKind` 判别字段选择实现。
//! 分项在数据库中只保存原始输入（等级序号 / 分值 / 0 或 1），得分始终由打分器计算。

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::errors::{MarkingError, Result};
use crate::models::criteria::entities::{
    CheckboxCriterion, CriterionKind, FlexibleCriterion, RubricCriterion,
};

/// 评分标准的原始输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawMark {
    Level(usize),
    Points(Decimal),
    Checked(bool),
}

pub trait CriterionScorer {
    fn score(&self, raw: &RawMark) -> Result<Decimal>;

    fn max_score(&self) -> Decimal;

    /// 存储值 → 原始输入
    fn decode_stored(&self, stored: Decimal) -> Result<RawMark>;

    /// 将请求中的 JSON 值解析为原始输入；`null` 或空字符串表示清除
    fn decode_json(&self, value: &serde_json::Value) -> Result<Option<RawMark>>;
}

impl RawMark {
    /// 原始输入 → 存储值
    pub fn to_stored(&self) -> Decimal {
        match self {
            RawMark::Level(level) => Decimal::from(*level as u64),
            RawMark::Points(points) => *points,
            RawMark::Checked(true) => Decimal::ONE,
            RawMark::Checked(false) => Decimal::ZERO,
        }
    }
}

fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn decimal_from_json(value: &serde_json::Value) -> Result<Decimal> {
    let parsed = match value {
        serde_json::Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text))
        }
        serde_json::Value::String(s) => {
            let text = s.trim();
            Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text))
        }
        _ => return Err(MarkingError::validation(format!("Mark must be a number: {value}"))),
    };
    parsed.map_err(|_| MarkingError::validation(format!("Mark must be a number: {value}")))
}

impl CriterionScorer for RubricCriterion {
    fn score(&self, raw: &RawMark) -> Result<Decimal> {
        let RawMark::Level(index) = raw else {
            return Err(MarkingError::validation(
                "Rubric criterion expects a level index",
            ));
        };
        let level = self.levels.get(*index).ok_or_else(|| {
            MarkingError::out_of_range(format!(
                "Level {index} is outside 0..{}",
                self.levels.len()
            ))
        })?;
        level.weight.checked_mul(self.weight).ok_or_else(|| {
            MarkingError::out_of_range(format!(
                "Level {index} weighted score exceeds the supported numeric range"
            ))
        })
    }

    fn max_score(&self) -> Decimal {
        self.levels
            .iter()
            .map(|l| l.weight)
            .max()
            .unwrap_or(Decimal::ZERO)
            .saturating_mul(self.weight)
    }

    fn decode_stored(&self, stored: Decimal) -> Result<RawMark> {
        if stored.fract() != Decimal::ZERO || stored < Decimal::ZERO {
            return Err(MarkingError::out_of_range(format!(
                "Stored rubric level {stored} is not a level index"
            )));
        }
        stored
            .to_usize()
            .map(RawMark::Level)
            .ok_or_else(|| MarkingError::out_of_range(format!("Invalid rubric level {stored}")))
    }

    fn decode_json(&self, value: &serde_json::Value) -> Result<Option<RawMark>> {
        if is_blank(value) {
            return Ok(None);
        }
        let level = decimal_from_json(value)?;
        if level < Decimal::ZERO {
            return Err(MarkingError::out_of_range(format!(
                "Level {level} is negative"
            )));
        }
        if level.fract() != Decimal::ZERO {
            return Err(MarkingError::validation(format!(
                "Level {level} is not an integer"
            )));
        }
        let raw = self.decode_stored(level)?;
        // 提前校验，越界时不写库
        self.score(&raw)?;
        Ok(Some(raw))
    }
}

impl CriterionScorer for FlexibleCriterion {
    fn score(&self, raw: &RawMark) -> Result<Decimal> {
        let RawMark::Points(points) = raw else {
            return Err(MarkingError::validation(
                "Flexible criterion expects a numeric mark",
            ));
        };
        if *points < Decimal::ZERO || *points > self.max_mark {
            return Err(MarkingError::out_of_range(format!(
                "Mark {points} is outside [0, {}]",
                self.max_mark
            )));
        }
        Ok(*points)
    }

    fn max_score(&self) -> Decimal {
        self.max_mark
    }

    fn decode_stored(&self, stored: Decimal) -> Result<RawMark> {
        Ok(RawMark::Points(stored))
    }

    fn decode_json(&self, value: &serde_json::Value) -> Result<Option<RawMark>> {
        if is_blank(value) {
            return Ok(None);
        }
        let raw = RawMark::Points(decimal_from_json(value)?.normalize());
        self.score(&raw)?;
        Ok(Some(raw))
    }
}

impl CriterionScorer for CheckboxCriterion {
    fn score(&self, raw: &RawMark) -> Result<Decimal> {
        match raw {
            RawMark::Checked(true) => Ok(self.weight),
            RawMark::Checked(false) => Ok(Decimal::ZERO),
            _ => Err(MarkingError::validation(
                "Checkbox criterion expects a boolean mark",
            )),
        }
    }

    fn max_score(&self) -> Decimal {
        self.weight
    }

    fn decode_stored(&self, stored: Decimal) -> Result<RawMark> {
        if stored == Decimal::ONE {
            Ok(RawMark::Checked(true))
        } else if stored.is_zero() {
            Ok(RawMark::Checked(false))
        } else {
            Err(MarkingError::out_of_range(format!(
                "Stored checkbox mark {stored} is neither 0 nor 1"
            )))
        }
    }

    fn decode_json(&self, value: &serde_json::Value) -> Result<Option<RawMark>> {
        if is_blank(value) {
            return Ok(None);
        }
        let checked = match value {
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::String(s) if s.trim() == "true" => true,
            serde_json::Value::String(s) if s.trim() == "false" => false,
            serde_json::Value::Number(_) | serde_json::Value::String(_) => {
                let n = decimal_from_json(value)?;
                if n == Decimal::ONE {
                    true
                } else if n.is_zero() {
                    false
                } else {
                    return Err(MarkingError::out_of_range(format!(
                        "Checkbox mark {n} must be 0 or 1"
                    )));
                }
            }
            _ => {
                return Err(MarkingError::validation(format!(
                    "Checkbox mark must be a boolean: {value}"
                )));
            }
        };
        Ok(Some(RawMark::Checked(checked)))
    }
}

impl CriterionKind {
    pub fn scorer(&self) -> &dyn CriterionScorer {
        match self {
            CriterionKind::Rubric(c) => c,
            CriterionKind::Flexible(c) => c,
            CriterionKind::Checkbox(c) => c,
        }
    }

    /// 由存储值直接算出得分
    pub fn score_stored(&self, stored: Decimal) -> Result<Decimal> {
        let scorer = self.scorer();
        let raw = scorer.decode_stored(stored)?;
        scorer.score(&raw)
    }

    pub fn max_score(&self) -> Decimal {
        self.scorer().max_score()
    }
}
