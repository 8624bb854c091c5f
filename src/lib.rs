//! Marking System - 编程作业批改结果生命周期服务
//!
//! 基于 Actix Web 构建，负责分项评分、扣分、总分汇总、批改状态与复评流程。
//!
//! # 架构
//! - `collaborators`: 外部协作者接口（代码仓库、宽限额度、截止时间）
//! - `config`: 配置管理
//! - `engine`: 批改引擎，对外操作入口
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `grading`: 纯计算核心（评分、扣分、汇总、状态机、复评）
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: HTTP 服务层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod collaborators;
pub mod config;
pub mod engine;
pub mod entity;
pub mod errors;
pub mod grading;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
