//! 分项分数实体

use sea_orm::entity::prelude::*;

use crate::utils::decimal::decimal_from_f64;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub result_id: i64,
    pub markable_id: i64,
    pub markable_type: String,
    pub mark: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::results::Entity",
        from = "Column::ResultId",
        to = "super::results::Column::Id"
    )]
    GradingResult,
    #[sea_orm(
        belongs_to = "super::criteria::Entity",
        from = "Column::MarkableId",
        to = "super::criteria::Column::Id"
    )]
    Criterion,
}

impl Related<super::results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GradingResult.def()
    }
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criterion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_mark(self) -> crate::errors::Result<crate::models::results::entities::Mark> {
        use crate::models::criteria::entities::CriterionType;
        use crate::models::results::entities::Mark;
        use chrono::{DateTime, Utc};

        Ok(Mark {
            id: self.id,
            result_id: self.result_id,
            markable_id: self.markable_id,
            markable_type: self.markable_type.parse::<CriterionType>()?,
            mark: self.mark.map(decimal_from_f64).transpose()?,
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
