use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{MarkingError, Result};

static MARKABLE_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(RubricCriterion|FlexibleCriterion|CheckboxCriterion)-([0-9]+)$")
        .expect("Invalid markable key regex")
});

// 评分标准类型（判别字段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/criterion.ts")]
pub enum CriterionType {
    #[serde(rename = "RubricCriterion")]
    Rubric,
    #[serde(rename = "FlexibleCriterion")]
    Flexible,
    #[serde(rename = "CheckboxCriterion")]
    Checkbox,
}

impl CriterionType {
    pub const RUBRIC: &'static str = "RubricCriterion";
    pub const FLEXIBLE: &'static str = "FlexibleCriterion";
    pub const CHECKBOX: &'static str = "CheckboxCriterion";
}

impl std::fmt::Display for CriterionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CriterionType::Rubric => write!(f, "{}", Self::RUBRIC),
            CriterionType::Flexible => write!(f, "{}", Self::FLEXIBLE),
            CriterionType::Checkbox => write!(f, "{}", Self::CHECKBOX),
        }
    }
}

impl std::str::FromStr for CriterionType {
    type Err = MarkingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            Self::RUBRIC => Ok(CriterionType::Rubric),
            Self::FLEXIBLE => Ok(CriterionType::Flexible),
            Self::CHECKBOX => Ok(CriterionType::Checkbox),
            _ => Err(MarkingError::validation(format!(
                "Invalid criterion type: {s}"
            ))),
        }
    }
}

/// Rubric 的一个等级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/criterion.ts")]
pub struct RubricLevel {
    pub name: String,
    #[ts(type = "number")]
    pub weight: Decimal,
}

/// 离散等级评分：得分 = 等级权重 × 标准权重
#[derive(Debug, Clone, PartialEq)]
pub struct RubricCriterion {
    pub weight: Decimal,
    pub levels: Vec<RubricLevel>,
}

/// 连续分值评分：得分取值于 `[0, max_mark]`
#[derive(Debug, Clone, PartialEq)]
pub struct FlexibleCriterion {
    pub max_mark: Decimal,
}

/// 通过/不通过：得分为标准权重或 0
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxCriterion {
    pub weight: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CriterionKind {
    Rubric(RubricCriterion),
    Flexible(FlexibleCriterion),
    Checkbox(CheckboxCriterion),
}

impl CriterionKind {
    pub fn criterion_type(&self) -> CriterionType {
        match self {
            CriterionKind::Rubric(_) => CriterionType::Rubric,
            CriterionKind::Flexible(_) => CriterionType::Flexible,
            CriterionKind::Checkbox(_) => CriterionType::Checkbox,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub id: i64,
    pub assignment_id: i64,
    pub name: String,
    pub position: i32,
    pub kind: CriterionKind,
}

impl Criterion {
    pub fn criterion_type(&self) -> CriterionType {
        self.kind.criterion_type()
    }

    pub fn markable_key(&self) -> MarkableKey {
        MarkableKey {
            criterion_type: self.criterion_type(),
            criterion_id: self.id,
        }
    }
}

/// JSON 契约中的分项键：`"<CriterionType>-<id>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkableKey {
    pub criterion_type: CriterionType,
    pub criterion_id: i64,
}

impl MarkableKey {
    pub fn new(criterion_type: CriterionType, criterion_id: i64) -> Self {
        Self {
            criterion_type,
            criterion_id,
        }
    }

    pub fn parse(key: &str) -> Result<Self> {
        let caps = MARKABLE_KEY_RE
            .captures(key.trim())
            .ok_or_else(|| MarkingError::validation(format!("Invalid markable key: {key}")))?;

        let criterion_type = caps[1].parse::<CriterionType>()?;
        let criterion_id = caps[2]
            .parse::<i64>()
            .map_err(|_| MarkingError::validation(format!("Invalid criterion id in key: {key}")))?;

        Ok(Self {
            criterion_type,
            criterion_id,
        })
    }
}

impl std::fmt::Display for MarkableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.criterion_type, self.criterion_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markable_key_parse() {
        let key = MarkableKey::parse("RubricCriterion-12").unwrap();
        assert_eq!(key.criterion_type, CriterionType::Rubric);
        assert_eq!(key.criterion_id, 12);
        assert_eq!(key.to_string(), "RubricCriterion-12");
    }

    #[test]
    fn test_markable_key_rejects_garbage() {
        assert!(MarkableKey::parse("Rubric-12").is_err());
        assert!(MarkableKey::parse("FlexibleCriterion-").is_err());
        assert!(MarkableKey::parse("CheckboxCriterion-1-2").is_err());
        assert!(MarkableKey::parse("").is_err());
    }

    #[test]
    fn test_criterion_type_roundtrip_through_str() {
        for ty in [
            CriterionType::Rubric,
            CriterionType::Flexible,
            CriterionType::Checkbox,
        ] {
            assert_eq!(ty.to_string().parse::<CriterionType>().unwrap(), ty);
        }
        assert!("Criterion".parse::<CriterionType>().is_err());
    }
}
