//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub short_identifier: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub allow_remarks: bool,
    pub remark_due_date: Option<i64>,
    pub anonymize_groups: bool,
    pub assign_graders_to_criteria: bool,
    pub hide_unassigned_criteria: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::groupings::Entity")]
    Groupings,
    #[sea_orm(has_many = "super::criteria::Entity")]
    Criteria,
}

impl Related<super::groupings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groupings.def()
    }
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criteria.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(self) -> crate::models::submissions::entities::Assignment {
        use crate::models::submissions::entities::Assignment;
        use chrono::{DateTime, Utc};

        Assignment {
            id: self.id,
            short_identifier: self.short_identifier,
            description: self.description,
            allow_remarks: self.allow_remarks,
            remark_due_date: self
                .remark_due_date
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            anonymize_groups: self.anonymize_groups,
            assign_graders_to_criteria: self.assign_graders_to_criteria,
            hide_unassigned_criteria: self.hide_unassigned_criteria,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
