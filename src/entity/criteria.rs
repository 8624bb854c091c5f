//! 评分标准实体
//!
//! 三种评分标准共用一张表，`criterion_type` 为判别字段；
//! rubric 的等级以 JSON 存于 `levels`。

use sea_orm::entity::prelude::*;

use crate::errors::MarkingError;
use crate::utils::decimal::decimal_from_f64;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "criteria")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub name: String,
    pub criterion_type: String,
    pub max_mark: f64,
    pub weight: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub levels: Option<String>,
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
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_criterion(
        self,
    ) -> crate::errors::Result<crate::models::criteria::entities::Criterion> {
        use crate::models::criteria::entities::{
            CheckboxCriterion, Criterion, CriterionKind, CriterionType, FlexibleCriterion,
            RubricCriterion, RubricLevel,
        };

        let kind = match self.criterion_type.parse::<CriterionType>()? {
            CriterionType::Rubric => {
                let levels: Vec<RubricLevel> = match self.levels.as_deref() {
                    Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)?,
                    _ => {
                        return Err(MarkingError::validation(format!(
                            "Rubric criterion {} has no levels",
                            self.id
                        )));
                    }
                };
                CriterionKind::Rubric(RubricCriterion {
                    weight: decimal_from_f64(self.weight)?,
                    levels,
                })
            }
            CriterionType::Flexible => CriterionKind::Flexible(FlexibleCriterion {
                max_mark: decimal_from_f64(self.max_mark)?,
            }),
            CriterionType::Checkbox => CriterionKind::Checkbox(CheckboxCriterion {
                weight: decimal_from_f64(self.weight)?,
            }),
        };

        Ok(Criterion {
            id: self.id,
            assignment_id: self.assignment_id,
            name: self.name,
            position: self.position,
            kind,
        })
    }
}
