//! 阅卷人与小组的分配关系

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grader_memberships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub grader_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub grouping_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::graders::Entity",
        from = "Column::GraderId",
        to = "super::graders::Column::Id"
    )]
    Grader,
    #[sea_orm(
        belongs_to = "super::groupings::Entity",
        from = "Column::GroupingId",
        to = "super::groupings::Column::Id"
    )]
    Grouping,
}

impl Related<super::graders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grader.def()
    }
}

impl Related<super::groupings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grouping.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
