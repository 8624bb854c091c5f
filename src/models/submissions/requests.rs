use serde::Deserialize;
use ts_rs::TS;

/// 批量收取提交请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct CollectRequest {
    pub grouping_ids: Vec<i64>,
    /// 为已有提交的小组重新收取最新版本
    #[serde(default)]
    pub override_existing: bool,
}

/// 下载压缩包查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct DownloadQuery {
    #[serde(default)]
    pub include_annotations: bool,
}

/// 成绩分布查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct DistributionQuery {
    pub intervals: Option<usize>,
}

/// 单文件下载查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct FileQuery {
    pub path: String,
    /// 图片以内联方式返回，其余文件一律作为附件
    #[serde(default)]
    pub show_in_browser: bool,
}

/// 小组导航方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

/// 小组导航查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct NavigationQuery {
    #[serde(default)]
    pub direction: Direction,
    pub grader_id: Option<i64>,
}
