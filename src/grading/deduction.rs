//! 扣分台账
//!
//! 汇总两类扣分：批注扣分（按评分标准累加，从该标准得分中扣除）与宽限期扣除
//! （只做求和与查询，余额校验交给宽限额度服务）。

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::errors::{MarkingError, Result};
use crate::models::annotations::entities::Annotation;
use crate::models::grace::entities::GracePeriodDeduction;

#[derive(Debug, Clone, Default)]
pub struct DeductionLedger {
    annotation_deductions: HashMap<i64, Decimal>,
    grace_deductions: Vec<GracePeriodDeduction>,
}

impl DeductionLedger {
    pub fn from_annotations(annotations: &[Annotation]) -> Self {
        let mut annotation_deductions: HashMap<i64, Decimal> = HashMap::new();
        for (criterion_id, amount) in annotations.iter().filter_map(Annotation::effective_deduction)
        {
            // 扣分超过任何可能得分后结果都为 0，饱和即可
            let total = annotation_deductions.entry(criterion_id).or_default();
            *total = total.saturating_add(amount);
        }
        Self {
            annotation_deductions,
            grace_deductions: Vec::new(),
        }
    }

    pub fn with_grace_deductions(mut self, deductions: Vec<GracePeriodDeduction>) -> Self {
        self.grace_deductions = deductions;
        self
    }

    pub fn deduction_for(&self, criterion_id: i64) -> Decimal {
        self.annotation_deductions
            .get(&criterion_id)
            .copied()
            .unwrap_or_default()
    }

    /// 扣除后的单项得分，不低于 0
    pub fn apply_to(&self, criterion_id: i64, score: Decimal) -> Decimal {
        (score - self.deduction_for(criterion_id)).max(Decimal::ZERO)
    }

    pub fn grace_deductions(&self) -> &[GracePeriodDeduction] {
        &self.grace_deductions
    }

    pub fn total_grace_units(&self) -> i64 {
        self.grace_deductions
            .iter()
            .map(|d| i64::from(d.deduction))
            .sum()
    }

    /// 查找属于该小组的宽限期扣除
    pub fn find_grace_deduction(
        &self,
        grouping_id: i64,
        deduction_id: i64,
    ) -> Result<&GracePeriodDeduction> {
        self.grace_deductions
            .iter()
            .find(|d| d.id == deduction_id && d.grouping_id == grouping_id)
            .ok_or_else(|| {
                MarkingError::not_found(format!(
                    "Grace period deduction {deduction_id} not found for grouping {grouping_id}"
                ))
            })
    }
}
