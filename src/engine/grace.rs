//! 宽限期扣除

use tracing::info;

use super::GradingEngine;
use crate::collaborators::collaborator_error;
use crate::errors::{MarkingError, Result};
use crate::grading::DeductionLedger;
use crate::models::grace::{entities::GracePeriodDeduction, responses::GraceDeductionList};

impl GradingEngine {
    /// 先向额度协作者确认余额，再记录扣除
    pub async fn add_grace_period_deduction(
        &self,
        membership_id: i64,
        deduction: i32,
    ) -> Result<GracePeriodDeduction> {
        if deduction <= 0 {
            return Err(MarkingError::validation(
                "Grace period deduction must be positive",
            ));
        }
        let membership = self
            .storage
            .get_membership(membership_id)
            .await?
            .ok_or_else(|| {
                MarkingError::not_found(format!("Membership {membership_id} not found"))
            })?;
        if !membership.is_active() {
            return Err(MarkingError::validation(format!(
                "Membership {membership_id} has not joined the group"
            )));
        }

        if !self
            .grace_credits
            .can_deduct(membership.student_id, deduction)
            .await
            .map_err(|e| collaborator_error("Grace credit lookup failed", e))?
        {
            return Err(MarkingError::validation(format!(
                "Student {} does not have {} grace credits left",
                membership.student_id, deduction
            )));
        }

        let created = self
            .storage
            .create_grace_deduction(membership_id, deduction)
            .await?;
        info!(
            "Grace deduction {} of {} units for student {}",
            created.id, deduction, membership.student_id
        );
        Ok(created)
    }

    /// 只能删除属于该小组成员的扣除
    pub async fn delete_grace_period_deduction(
        &self,
        grouping_id: i64,
        deduction_id: i64,
    ) -> Result<()> {
        let ledger = DeductionLedger::default()
            .with_grace_deductions(self.storage.list_grace_deductions(grouping_id).await?);
        ledger.find_grace_deduction(grouping_id, deduction_id)?;

        if !self.storage.delete_grace_deduction(deduction_id).await? {
            return Err(MarkingError::not_found(format!(
                "Grace period deduction {deduction_id} not found"
            )));
        }
        Ok(())
    }

    pub async fn grace_period_deductions(&self, grouping_id: i64) -> Result<GraceDeductionList> {
        self.grouping(grouping_id).await?;
        let ledger = DeductionLedger::default()
            .with_grace_deductions(self.storage.list_grace_deductions(grouping_id).await?);
        Ok(GraceDeductionList {
            total_units: ledger.total_grace_units(),
            items: ledger.grace_deductions().to_vec(),
        })
    }
}
