//! 业务数据模型
//!
//! 与 `entity` 模块中的数据库实体分离；存储层负责两者之间的转换。

pub mod annotations;
pub mod common;
pub mod criteria;
pub mod grace;
pub mod graders;
pub mod results;
pub mod submissions;
pub mod tags;

pub use common::error_code::ErrorCode;
pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
