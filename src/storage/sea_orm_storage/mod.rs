//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod annotations;
mod assignments;
mod grace;
mod graders;
mod results;
mod snapshot;
mod submissions;
mod tags;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{MarkingError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    write_gate: Arc<Mutex<()>>,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| MarkingError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self::from_connection(db))
    }

    /// 使用已建立的连接（不运行迁移）
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            db,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// SQLite 只允许单个写者，且读后升级写锁不会等待 busy_timeout：
    /// 写操作须先取得此闸门。其他后端依赖行锁，返回 `None`。
    pub(crate) async fn write_gate(&self) -> Option<MutexGuard<'_, ()>> {
        match self.db.get_database_backend() {
            DbBackend::Sqlite => Some(self.write_gate.lock().await),
            _ => None,
        }
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    pub(crate) async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| MarkingError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| MarkingError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| MarkingError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(MarkingError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::collaborators::Revision;
use crate::models::{
    annotations::entities::AnnotationCategory,
    criteria::entities::Criterion,
    grace::entities::GracePeriodDeduction,
    graders::entities::{Grader, GraderAssignment},
    results::{
        entities::{GradingResult, ResultSnapshot},
        mutations::{ResultMutationOutcome, SubmissionMutationOutcome},
    },
    submissions::entities::{
        Assignment, Grouping, GroupingOverview, Membership, Student, Submission, SubmissionContext,
    },
    tags::entities::Tag,
};
use crate::storage::{ResultMutator, Storage, SubmissionMutator};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 作业与小组
    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_impl(assignment_id).await
    }

    async fn get_grouping(&self, grouping_id: i64) -> Result<Option<Grouping>> {
        self.get_grouping_impl(grouping_id).await
    }

    async fn list_criteria(&self, assignment_id: i64) -> Result<Vec<Criterion>> {
        self.list_criteria_impl(assignment_id).await
    }

    async fn list_grouping_overviews(&self, assignment_id: i64) -> Result<Vec<GroupingOverview>> {
        self.list_grouping_overviews_impl(assignment_id).await
    }

    // 阅卷人
    async fn get_grader(&self, grader_id: i64) -> Result<Option<Grader>> {
        self.get_grader_impl(grader_id).await
    }

    async fn load_grader_assignment(
        &self,
        grader_id: i64,
        assignment_id: i64,
    ) -> Result<GraderAssignment> {
        self.load_grader_assignment_impl(grader_id, assignment_id).await
    }

    // 学生与成员
    async fn get_student(&self, student_id: i64) -> Result<Option<Student>> {
        self.get_student_impl(student_id).await
    }

    async fn get_membership(&self, membership_id: i64) -> Result<Option<Membership>> {
        self.get_membership_impl(membership_id).await
    }

    // 提交与结果
    async fn get_submission(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_impl(submission_id).await
    }

    async fn get_result(&self, result_id: i64) -> Result<Option<GradingResult>> {
        self.get_result_impl(result_id).await
    }

    async fn load_result_snapshot(&self, result_id: i64) -> Result<Option<ResultSnapshot>> {
        self.load_result_snapshot_impl(result_id).await
    }

    async fn load_submission_context(
        &self,
        submission_id: i64,
    ) -> Result<Option<SubmissionContext>> {
        self.load_submission_context_impl(submission_id).await
    }

    async fn create_collected_submission(
        &self,
        grouping_id: i64,
        revision: Revision,
    ) -> Result<(Submission, GradingResult)> {
        self.create_collected_submission_impl(grouping_id, revision)
            .await
    }

    async fn mutate_result(
        &self,
        result_id: i64,
        mutator: ResultMutator,
    ) -> Result<ResultMutationOutcome> {
        self.mutate_result_impl(result_id, mutator).await
    }

    async fn mutate_submission(
        &self,
        submission_id: i64,
        mutator: SubmissionMutator,
    ) -> Result<SubmissionMutationOutcome> {
        self.mutate_submission_impl(submission_id, mutator).await
    }

    async fn find_extra_mark_result(&self, extra_mark_id: i64) -> Result<Option<i64>> {
        self.find_extra_mark_result_impl(extra_mark_id).await
    }

    async fn find_annotation_result(&self, annotation_id: i64) -> Result<Option<i64>> {
        self.find_annotation_result_impl(annotation_id).await
    }

    // 批注分类
    async fn list_annotation_categories(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<AnnotationCategory>> {
        self.list_annotation_categories_impl(assignment_id).await
    }

    // 宽限期扣除
    async fn list_grace_deductions(&self, grouping_id: i64) -> Result<Vec<GracePeriodDeduction>> {
        self.list_grace_deductions_impl(grouping_id).await
    }

    async fn grace_units_used_by_student(&self, student_id: i64) -> Result<i64> {
        self.grace_units_used_by_student_impl(student_id).await
    }

    async fn create_grace_deduction(
        &self,
        membership_id: i64,
        deduction: i32,
    ) -> Result<GracePeriodDeduction> {
        self.create_grace_deduction_impl(membership_id, deduction)
            .await
    }

    async fn delete_grace_deduction(&self, deduction_id: i64) -> Result<bool> {
        self.delete_grace_deduction_impl(deduction_id).await
    }

    // 标签
    async fn create_tag(&self, name: &str, description: Option<String>) -> Result<Tag> {
        self.create_tag_impl(name, description).await
    }

    async fn get_tag(&self, tag_id: i64) -> Result<Option<Tag>> {
        self.get_tag_impl(tag_id).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.list_tags_impl().await
    }

    async fn add_grouping_tag(&self, grouping_id: i64, tag_id: i64) -> Result<bool> {
        self.add_grouping_tag_impl(grouping_id, tag_id).await
    }

    async fn remove_grouping_tag(&self, grouping_id: i64, tag_id: i64) -> Result<bool> {
        self.remove_grouping_tag_impl(grouping_id, tag_id).await
    }

    async fn list_grouping_tags(&self, grouping_id: i64) -> Result<Vec<Tag>> {
        self.list_grouping_tags_impl(grouping_id).await
    }
}
