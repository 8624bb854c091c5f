//! 小组成员实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "memberships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub grouping_id: i64,
    pub student_id: i64,
    pub membership_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groupings::Entity",
        from = "Column::GroupingId",
        to = "super::groupings::Column::Id"
    )]
    Grouping,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::grace_period_deductions::Entity")]
    GracePeriodDeductions,
}

impl Related<super::groupings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grouping.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::grace_period_deductions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GracePeriodDeductions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_membership(self) -> crate::models::submissions::entities::Membership {
        crate::models::submissions::entities::Membership {
            id: self.id,
            grouping_id: self.grouping_id,
            student_id: self.student_id,
            membership_status: self.membership_status,
        }
    }
}
