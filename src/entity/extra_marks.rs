//! 附加分实体

use sea_orm::entity::prelude::*;

use crate::utils::decimal::decimal_from_f64;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "extra_marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub result_id: i64,
    pub extra_mark: f64,
    pub unit: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::results::Entity",
        from = "Column::ResultId",
        to = "super::results::Column::Id"
    )]
    GradingResult,
}

impl Related<super::results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GradingResult.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_extra_mark(
        self,
    ) -> crate::errors::Result<crate::models::results::entities::ExtraMark> {
        use crate::models::results::entities::{ExtraMark, ExtraMarkUnit};
        use chrono::{DateTime, Utc};

        Ok(ExtraMark {
            id: self.id,
            result_id: self.result_id,
            extra_mark: decimal_from_f64(self.extra_mark)?,
            unit: self.unit.parse::<ExtraMarkUnit>()?,
            description: self.description,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        })
    }
}
