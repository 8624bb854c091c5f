use std::sync::Arc;
use tracing::{debug, warn};

use crate::collaborators::{AssignmentDeadlinePolicy, FsRepository, StorageGraceCredits};
use crate::config::AppConfig;
use crate::engine::GradingEngine;
use crate::errors::Result;
use crate::storage::Storage;

pub struct StartupContext {
    pub engine: GradingEngine,
}

/// 组装默认协作者
fn build_engine(storage: Arc<dyn Storage>) -> GradingEngine {
    let config = AppConfig::get();

    let repository = FsRepository::new(config.repository.root.clone());
    debug!("Repository root: {}", config.repository.root);

    GradingEngine::new(
        storage.clone(),
        Arc::new(repository),
        Arc::new(StorageGraceCredits::new(storage)),
        Arc::new(AssignmentDeadlinePolicy),
    )
    .with_distribution_intervals(config.grading.distribution_intervals)
}

/// 准备服务器启动的上下文
/// 包括存储和批改引擎
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let engine = build_engine(storage);
    warn!("Grading engine ready");

    Ok(StartupContext { engine })
}
