//! 标签存储操作

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::SeaOrmStorage;
use super::snapshot::db_err;
use crate::entity::prelude::*;
use crate::entity::{grouping_tags, tags};
use crate::errors::{MarkingError, Result};
use crate::models::tags::entities::Tag;

impl SeaOrmStorage {
    pub async fn create_tag_impl(&self, name: &str, description: Option<String>) -> Result<Tag> {
        let _gate = self.write_gate().await;
        let exists = Tags::find()
            .filter(tags::Column::Name.eq(name))
            .count(&self.db)
            .await
            .map_err(db_err("查询标签失败"))?
            > 0;
        if exists {
            return Err(MarkingError::validation(format!("Tag '{name}' already exists")));
        }

        let model = tags::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建标签失败"))?;

        Ok(model.into_tag())
    }

    pub async fn get_tag_impl(&self, tag_id: i64) -> Result<Option<Tag>> {
        let result = Tags::find_by_id(tag_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询标签失败"))?;

        Ok(result.map(|m| m.into_tag()))
    }

    pub async fn list_tags_impl(&self) -> Result<Vec<Tag>> {
        let rows = Tags::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err("查询标签列表失败"))?;

        Ok(rows.into_iter().map(|m| m.into_tag()).collect())
    }

    pub async fn add_grouping_tag_impl(&self, grouping_id: i64, tag_id: i64) -> Result<bool> {
        let _gate = self.write_gate().await;
        let existing = GroupingTags::find_by_id((grouping_id, tag_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询小组标签失败"))?;
        if existing.is_some() {
            return Ok(false);
        }

        grouping_tags::ActiveModel {
            grouping_id: Set(grouping_id),
            tag_id: Set(tag_id),
        }
        .insert(&self.db)
        .await
        .map_err(db_err("添加小组标签失败"))?;

        Ok(true)
    }

    pub async fn remove_grouping_tag_impl(&self, grouping_id: i64, tag_id: i64) -> Result<bool> {
        let _gate = self.write_gate().await;
        let result = GroupingTags::delete_by_id((grouping_id, tag_id))
            .exec(&self.db)
            .await
            .map_err(db_err("移除小组标签失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_grouping_tags_impl(&self, grouping_id: i64) -> Result<Vec<Tag>> {
        let tag_ids: Vec<i64> = GroupingTags::find()
            .filter(grouping_tags::Column::GroupingId.eq(grouping_id))
            .all(&self.db)
            .await
            .map_err(db_err("查询小组标签失败"))?
            .into_iter()
            .map(|l| l.tag_id)
            .collect();
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Tags::find()
            .filter(tags::Column::Id.is_in(tag_ids))
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err("查询标签失败"))?;

        Ok(rows.into_iter().map(|m| m.into_tag()).collect())
    }
}
