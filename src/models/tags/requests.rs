use serde::Deserialize;
use ts_rs::TS;

/// 创建标签请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tag.ts")]
pub struct CreateTagRequest {
    pub name: String,
    pub description: Option<String>,
}
