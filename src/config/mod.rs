//! 配置管理
//!
//! 静态配置（文件 + 环境变量）在启动时加载一次，之后只读。

mod r#impl;
mod structs;

pub use structs::*;
