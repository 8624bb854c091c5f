//! 宽限期扣除实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grace_period_deductions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub membership_id: i64,
    pub deduction: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::memberships::Entity",
        from = "Column::MembershipId",
        to = "super::memberships::Column::Id"
    )]
    Membership,
}

impl Related<super::memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Membership.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 需要成员信息补全学生与小组
    pub fn into_grace_deduction(
        self,
        membership: &super::memberships::Model,
    ) -> crate::models::grace::entities::GracePeriodDeduction {
        use crate::models::grace::entities::GracePeriodDeduction;
        use chrono::{DateTime, Utc};

        GracePeriodDeduction {
            id: self.id,
            membership_id: self.membership_id,
            student_id: membership.student_id,
            grouping_id: membership.grouping_id,
            deduction: self.deduction,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
