//! 批注分类实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "annotation_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub annotation_category_name: String,
    pub flexible_criterion_id: Option<i64>,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::criteria::Entity",
        from = "Column::FlexibleCriterionId",
        to = "super::criteria::Column::Id"
    )]
    FlexibleCriterion,
    #[sea_orm(has_many = "super::annotation_texts::Entity")]
    AnnotationTexts,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FlexibleCriterion.def()
    }
}

impl Related<super::annotation_texts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnnotationTexts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 关联了评分标准的分类，名称后附加 ` [标准名]`
    pub fn into_category(
        self,
        criterion_name: Option<&str>,
        texts: Vec<crate::models::annotations::entities::AnnotationText>,
    ) -> crate::models::annotations::entities::AnnotationCategory {
        use crate::models::annotations::entities::AnnotationCategory;

        let annotation_category_name = match criterion_name {
            Some(name) => format!("{} [{}]", self.annotation_category_name, name),
            None => self.annotation_category_name,
        };

        AnnotationCategory {
            id: self.id,
            assignment_id: self.assignment_id,
            annotation_category_name,
            flexible_criterion_id: self.flexible_criterion_id,
            position: self.position,
            texts,
        }
    }
}
