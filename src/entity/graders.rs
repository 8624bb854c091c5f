//! 阅卷人实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "graders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_name: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::grader_memberships::Entity")]
    GraderMemberships,
    #[sea_orm(has_many = "super::criterion_grader_associations::Entity")]
    CriterionGraderAssociations,
}

impl Related<super::grader_memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GraderMemberships.def()
    }
}

impl Related<super::criterion_grader_associations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CriterionGraderAssociations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grader(self) -> crate::models::graders::entities::Grader {
        use crate::models::graders::entities::Grader;
        use chrono::{DateTime, Utc};

        Grader {
            id: self.id,
            user_name: self.user_name,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
