//! 批注分类存储操作

use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use super::snapshot::db_err;
use crate::entity::prelude::*;
use crate::entity::{annotation_categories, annotation_texts, criteria};
use crate::errors::Result;
use crate::models::annotations::entities::{AnnotationCategory, AnnotationText};

impl SeaOrmStorage {
    /// 按位置列出分类及其文本
    pub async fn list_annotation_categories_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<AnnotationCategory>> {
        let categories = AnnotationCategories::find()
            .filter(annotation_categories::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(annotation_categories::Column::Position)
            .order_by_asc(annotation_categories::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询批注分类失败"))?;
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let category_ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
        let mut texts: HashMap<i64, Vec<AnnotationText>> = HashMap::new();
        for text in AnnotationTexts::find()
            .filter(annotation_texts::Column::AnnotationCategoryId.is_in(category_ids))
            .order_by_asc(annotation_texts::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询批注文本失败"))?
        {
            if let Some(category_id) = text.annotation_category_id {
                texts
                    .entry(category_id)
                    .or_default()
                    .push(text.into_annotation_text()?);
            }
        }

        let criterion_ids: Vec<i64> = categories
            .iter()
            .filter_map(|c| c.flexible_criterion_id)
            .collect();
        let criterion_names: HashMap<i64, String> = if criterion_ids.is_empty() {
            HashMap::new()
        } else {
            Criteria::find()
                .filter(criteria::Column::Id.is_in(criterion_ids))
                .all(&self.db)
                .await
                .map_err(db_err("查询评分标准失败"))?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect()
        };

        Ok(categories
            .into_iter()
            .map(|category| {
                let name = category
                    .flexible_criterion_id
                    .and_then(|id| criterion_names.get(&id))
                    .map(String::as_str);
                let category_texts = texts.remove(&category.id).unwrap_or_default();
                category.into_category(name, category_texts)
            })
            .collect())
    }
}
