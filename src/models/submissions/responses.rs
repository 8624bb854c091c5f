use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

use crate::models::results::entities::ResultStatus;

/// 提交列表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionRow {
    pub grouping_id: i64,
    pub group_name: String,
    pub submission_id: Option<i64>,
    pub result_id: Option<i64>,
    pub revision_identifier: Option<String>,
    pub revision_timestamp: Option<chrono::DateTime<chrono::Utc>>,
    pub marking_state: ResultStatus,
    pub grace_credits_used: i32,
    #[ts(type = "number | null")]
    pub final_grade: Option<Decimal>,
    pub tags: Vec<String>,
}

/// 成绩分布
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeDistribution {
    pub buckets: Vec<usize>,
    pub count: usize,
    #[ts(type = "number")]
    pub average: Decimal,
    #[ts(type = "number")]
    pub median: Decimal,
}

/// 压缩包导出结果
#[derive(Debug, Clone)]
pub struct ZipExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 相邻小组
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GroupingNavigation {
    pub grouping_id: i64,
    pub group_name: String,
    pub submission_id: i64,
    pub result_id: i64,
}

/// 单个提交文件
#[derive(Debug, Clone)]
pub struct FileDownload {
    pub file_name: String,
    pub content_type: String,
    /// 是否以内联方式展示
    pub inline: bool,
    pub bytes: Vec<u8>,
}
