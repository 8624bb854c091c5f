use serde::Deserialize;
use ts_rs::TS;

/// 添加批注请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/annotation.ts")]
pub struct AddAnnotationRequest {
    pub annotation_text_id: i64,
    pub submission_file: String,
    pub line_start: i32,
    pub line_end: i32,
}
