//! 批注文本实体

use sea_orm::entity::prelude::*;

use crate::utils::decimal::decimal_from_f64;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "annotation_texts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub annotation_category_id: Option<i64>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub deduction: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::annotation_categories::Entity",
        from = "Column::AnnotationCategoryId",
        to = "super::annotation_categories::Column::Id"
    )]
    AnnotationCategory,
    #[sea_orm(has_many = "super::annotations::Entity")]
    Annotations,
}

impl Related<super::annotation_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnnotationCategory.def()
    }
}

impl Related<super::annotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Annotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_annotation_text(
        self,
    ) -> crate::errors::Result<crate::models::annotations::entities::AnnotationText> {
        Ok(crate::models::annotations::entities::AnnotationText {
            id: self.id,
            annotation_category_id: self.annotation_category_id,
            content: self.content,
            deduction: self.deduction.map(decimal_from_f64).transpose()?,
        })
    }
}
