//! 批注实体

use sea_orm::entity::prelude::*;

use crate::utils::decimal::decimal_from_f64;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "annotations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub result_id: i64,
    pub annotation_text_id: i64,
    pub submission_file: String,
    pub line_start: i32,
    pub line_end: i32,
    pub annotation_number: i32,
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
    #[sea_orm(
        belongs_to = "super::annotation_texts::Entity",
        from = "Column::AnnotationTextId",
        to = "super::annotation_texts::Column::Id"
    )]
    AnnotationText,
}

impl Related<super::results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GradingResult.def()
    }
}

impl Related<super::annotation_texts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnnotationText.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 合并批注文本与所属分类，得到可参与扣分计算的批注
    pub fn into_annotation(
        self,
        text: &super::annotation_texts::Model,
        category: Option<&super::annotation_categories::Model>,
    ) -> crate::errors::Result<crate::models::annotations::entities::Annotation> {
        use crate::models::annotations::entities::Annotation;
        use chrono::{DateTime, Utc};

        Ok(Annotation {
            id: self.id,
            result_id: self.result_id,
            annotation_text_id: self.annotation_text_id,
            submission_file: self.submission_file,
            line_start: self.line_start,
            line_end: self.line_end,
            annotation_number: self.annotation_number,
            content: text.content.clone(),
            criterion_id: category.and_then(|c| c.flexible_criterion_id),
            deduction: text.deduction.map(decimal_from_f64).transpose()?,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        })
    }
}
