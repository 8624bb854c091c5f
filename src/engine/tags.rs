//! 标签

use super::GradingEngine;
use crate::errors::{MarkingError, Result};
use crate::models::tags::entities::Tag;

impl GradingEngine {
    pub async fn create_tag(&self, name: &str, description: Option<String>) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MarkingError::validation("Tag name is empty"));
        }
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.storage.create_tag(name, description).await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.storage.list_tags().await
    }

    /// 已存在时不做任何事
    pub async fn add_tag(&self, grouping_id: i64, tag_id: i64) -> Result<Vec<Tag>> {
        self.grouping(grouping_id).await?;
        self.tag(tag_id).await?;
        self.storage.add_grouping_tag(grouping_id, tag_id).await?;
        self.storage.list_grouping_tags(grouping_id).await
    }

    /// 不存在时不做任何事
    pub async fn remove_tag(&self, grouping_id: i64, tag_id: i64) -> Result<Vec<Tag>> {
        self.grouping(grouping_id).await?;
        self.storage.remove_grouping_tag(grouping_id, tag_id).await?;
        self.storage.list_grouping_tags(grouping_id).await
    }

    pub async fn grouping_tags(&self, grouping_id: i64) -> Result<Vec<Tag>> {
        self.grouping(grouping_id).await?;
        self.storage.list_grouping_tags(grouping_id).await
    }

    async fn tag(&self, tag_id: i64) -> Result<Tag> {
        self.storage
            .get_tag(tag_id)
            .await?
            .ok_or_else(|| MarkingError::not_found(format!("Tag {tag_id} not found")))
    }
}
