//! 测试用数据库与基础数据

use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use migration::{Migrator, MigratorTrait};
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, SqlxSqliteConnector};

use super::SeaOrmStorage;
use crate::entity::{
    annotation_categories, annotation_texts, assignments, criteria, criterion_grader_associations,
    grader_memberships, graders, groupings, memberships, results, students, submissions,
};
use crate::models::submissions::entities::Membership;

/// 单连接内存库：事务之间天然串行
pub(crate) async fn memory_db() -> DatabaseConnection {
    let opt = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opt)
        .await
        .unwrap();
    let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
    Migrator::up(&db, None).await.unwrap();
    db
}

/// 临时文件上的多连接库，连接参数与生产一致
pub(crate) async fn file_db() -> DatabaseConnection {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let path = std::env::temp_dir().join(format!(
        "marking-test-{}-{}.db",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let db = SeaOrmStorage::connect_sqlite(&url, 8, 30).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// 一个作业、一个小组、一名学生，以及已收取的提交与空白结果。
/// 评分标准：rubric（等级 0..4，满分 4）与 flexible（满分 10）。
pub(crate) struct Fixture {
    pub db: DatabaseConnection,
    pub assignment_id: i64,
    pub grouping_id: i64,
    pub student_id: i64,
    pub membership_id: i64,
    pub submission_id: i64,
    pub result_id: i64,
    pub rubric_id: i64,
    pub flexible_id: i64,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_options(true, false).await
    }

    pub async fn with_options(allow_remarks: bool, anonymize_groups: bool) -> Self {
        Self::seed(memory_db().await, allow_remarks, anonymize_groups).await
    }

    /// 多连接 WAL 文件库，用于并发写测试
    pub async fn on_file() -> Self {
        Self::seed(file_db().await, true, false).await
    }

    async fn seed(db: DatabaseConnection, allow_remarks: bool, anonymize_groups: bool) -> Self {
        let now = chrono::Utc::now().timestamp();

        let assignment = assignments::ActiveModel {
            short_identifier: Set("A1".to_string()),
            description: Set(Some("Linked lists".to_string())),
            allow_remarks: Set(allow_remarks),
            remark_due_date: Set(None),
            anonymize_groups: Set(anonymize_groups),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let rubric = criteria::ActiveModel {
            assignment_id: Set(assignment.id),
            name: Set("Style".to_string()),
            criterion_type: Set("RubricCriterion".to_string()),
            max_mark: Set(4.0),
            weight: Set(1.0),
            levels: Set(Some(
                r#"[{"name":"Missing","weight":0},{"name":"Poor","weight":1},{"name":"Fair","weight":2},{"name":"Good","weight":3},{"name":"Excellent","weight":4}]"#
                    .to_string(),
            )),
            position: Set(0),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let flexible = criteria::ActiveModel {
            assignment_id: Set(assignment.id),
            name: Set("Correctness".to_string()),
            criterion_type: Set("FlexibleCriterion".to_string()),
            max_mark: Set(10.0),
            weight: Set(1.0),
            levels: Set(None),
            position: Set(1),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let student = students::ActiveModel {
            user_name: Set("c5student".to_string()),
            grace_credits: Set(3),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let grouping_id = add_grouping(&db, assignment.id, "group_0001").await;

        let membership = memberships::ActiveModel {
            grouping_id: Set(grouping_id),
            student_id: Set(student.id),
            membership_status: Set(Membership::STATUS_INVITER.to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let (submission_id, result_id) = add_submission(&db, grouping_id).await;

        Self {
            db,
            assignment_id: assignment.id,
            grouping_id,
            student_id: student.id,
            membership_id: membership.id,
            submission_id,
            result_id,
            rubric_id: rubric.id,
            flexible_id: flexible.id,
        }
    }

    pub fn storage(&self) -> SeaOrmStorage {
        SeaOrmStorage::from_connection(self.db.clone())
    }

    /// 新建批注文本；`criterion_id` 非空时同时新建关联该标准的分类
    pub async fn annotation_text(
        &self,
        criterion_id: Option<i64>,
        content: &str,
        deduction: Option<f64>,
    ) -> i64 {
        let category = annotation_categories::ActiveModel {
            assignment_id: Set(self.assignment_id),
            annotation_category_name: Set("Bugs".to_string()),
            flexible_criterion_id: Set(criterion_id),
            position: Set(0),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap();

        annotation_texts::ActiveModel {
            annotation_category_id: Set(Some(category.id)),
            content: Set(content.to_string()),
            deduction: Set(deduction),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
        .id
    }

    /// 新建阅卷人并分配小组与评分标准
    pub async fn add_grader(
        &self,
        user_name: &str,
        grouping_ids: &[i64],
        criterion_ids: &[i64],
    ) -> i64 {
        let grader = graders::ActiveModel {
            user_name: Set(user_name.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap();

        for &grouping_id in grouping_ids {
            grader_memberships::Entity::insert(grader_memberships::ActiveModel {
                grader_id: Set(grader.id),
                grouping_id: Set(grouping_id),
            })
            .exec_without_returning(&self.db)
            .await
            .unwrap();
        }
        for &criterion_id in criterion_ids {
            criterion_grader_associations::Entity::insert(
                criterion_grader_associations::ActiveModel {
                    grader_id: Set(grader.id),
                    criterion_id: Set(criterion_id),
                },
            )
            .exec_without_returning(&self.db)
            .await
            .unwrap();
        }
        grader.id
    }

    /// 打开按阅卷人分配评分标准，`hide` 决定是否隐藏未分配的标准
    pub async fn assign_criteria_to_graders(&self, hide: bool) {
        assignments::ActiveModel {
            id: Set(self.assignment_id),
            assign_graders_to_criteria: Set(true),
            hide_unassigned_criteria: Set(hide),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .unwrap();
    }
}

pub(crate) async fn add_grouping(db: &DatabaseConnection, assignment_id: i64, name: &str) -> i64 {
    groupings::ActiveModel {
        assignment_id: Set(assignment_id),
        group_name: Set(name.to_string()),
        repo_name: Set(name.to_string()),
        created_at: Set(chrono::Utc::now().timestamp()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

/// 已收取的提交与一个空白原始结果
pub(crate) async fn add_submission(db: &DatabaseConnection, grouping_id: i64) -> (i64, i64) {
    let now = chrono::Utc::now().timestamp();
    let submission = submissions::ActiveModel {
        grouping_id: Set(grouping_id),
        revision_identifier: Set("r1".to_string()),
        revision_timestamp: Set(Some(now)),
        submission_version: Set(1),
        version_used: Set(true),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let result = results::ActiveModel {
        submission_id: Set(submission.id),
        marking_state: Set("incomplete".to_string()),
        total_mark: Set(0.0),
        overall_comment: Set(None),
        released_to_students: Set(false),
        is_remark: Set(false),
        remark_request_timestamp: Set(None),
        remark_request_text: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    (submission.id, result.id)
}
