//! 阅卷人与评分标准的分配关系

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "criterion_grader_associations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub grader_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub criterion_id: i64,
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
        belongs_to = "super::criteria::Entity",
        from = "Column::CriterionId",
        to = "super::criteria::Column::Id"
    )]
    Criterion,
}

impl Related<super::graders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grader.def()
    }
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criterion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
