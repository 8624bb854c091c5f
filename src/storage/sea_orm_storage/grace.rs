//! 宽限期扣除存储操作

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::SeaOrmStorage;
use super::snapshot::db_err;
use crate::entity::prelude::*;
use crate::entity::{grace_period_deductions, memberships};
use crate::errors::{MarkingError, Result};
use crate::models::grace::entities::GracePeriodDeduction;

impl SeaOrmStorage {
    pub async fn list_grace_deductions_impl(
        &self,
        grouping_id: i64,
    ) -> Result<Vec<GracePeriodDeduction>> {
        let members: HashMap<i64, memberships::Model> = Memberships::find()
            .filter(memberships::Column::GroupingId.eq(grouping_id))
            .all(&self.db)
            .await
            .map_err(db_err("查询小组成员失败"))?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        if members.is_empty() {
            return Ok(Vec::new());
        }

        let rows = GracePeriodDeductions::find()
            .filter(grace_period_deductions::Column::MembershipId.is_in(members.keys().copied()))
            .order_by_asc(grace_period_deductions::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询宽限期扣除失败"))?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let membership = members.get(&row.membership_id)?;
                Some(row.into_grace_deduction(membership))
            })
            .collect())
    }

    /// 学生在所有小组中已使用的宽限单位
    pub async fn grace_units_used_by_student_impl(&self, student_id: i64) -> Result<i64> {
        units_used_by_student(&self.db, student_id).await
    }

    /// 在锁定学生行的事务内复核余额后写入，余额不足时返回 `Validation`
    pub async fn create_grace_deduction_impl(
        &self,
        membership_id: i64,
        deduction: i32,
    ) -> Result<GracePeriodDeduction> {
        let _gate = self.write_gate().await;
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let membership = Memberships::find_by_id(membership_id)
            .one(&txn)
            .await
            .map_err(db_err("查询小组成员失败"))?
            .ok_or_else(|| {
                MarkingError::not_found(format!("Membership {membership_id} not found"))
            })?;

        let student = Students::find_by_id(membership.student_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err("锁定学生失败"))?
            .ok_or_else(|| {
                MarkingError::not_found(format!("Student {} not found", membership.student_id))
            })?;

        let used = units_used_by_student(&txn, student.id).await?;
        let remaining = i64::from(student.grace_credits) - used;
        if i64::from(deduction) > remaining {
            return Err(MarkingError::validation(format!(
                "Student {} has {} grace credits left, cannot deduct {}",
                student.id, remaining, deduction
            )));
        }

        let model = grace_period_deductions::ActiveModel {
            membership_id: Set(membership_id),
            deduction: Set(deduction),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("创建宽限期扣除失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(model.into_grace_deduction(&membership))
    }

    pub async fn delete_grace_deduction_impl(&self, deduction_id: i64) -> Result<bool> {
        let _gate = self.write_gate().await;
        let result = GracePeriodDeductions::delete_by_id(deduction_id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除宽限期扣除失败"))?;

        Ok(result.rows_affected > 0)
    }
}

async fn units_used_by_student<C: ConnectionTrait>(db: &C, student_id: i64) -> Result<i64> {
    let membership_ids: Vec<i64> = Memberships::find()
        .filter(memberships::Column::StudentId.eq(student_id))
        .all(db)
        .await
        .map_err(db_err("查询小组成员失败"))?
        .into_iter()
        .map(|m| m.id)
        .collect();
    if membership_ids.is_empty() {
        return Ok(0);
    }

    let used = GracePeriodDeductions::find()
        .filter(grace_period_deductions::Column::MembershipId.is_in(membership_ids))
        .all(db)
        .await
        .map_err(db_err("查询宽限期扣除失败"))?
        .iter()
        .map(|d| i64::from(d.deduction))
        .sum();
    Ok(used)
}
