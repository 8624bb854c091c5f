use serde::Serialize;
use ts_rs::TS;

use crate::models::results::entities::GradingResult;
use crate::models::tags::entities::Tag;

/// 作业（评分相关配置）
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Assignment {
    pub id: i64,
    pub short_identifier: String,
    pub description: Option<String>,
    pub allow_remarks: bool,
    pub remark_due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub anonymize_groups: bool,
    /// 评分标准按阅卷人分配
    pub assign_graders_to_criteria: bool,
    /// 阅卷人只能看到分配给自己的评分标准
    pub hide_unassigned_criteria: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Grouping {
    pub id: i64,
    pub assignment_id: i64,
    pub group_name: String,
    pub repo_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Student {
    pub id: i64,
    pub user_name: String,
    pub grace_credits: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 小组成员身份
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Membership {
    pub id: i64,
    pub grouping_id: i64,
    pub student_id: i64,
    pub membership_status: String,
}

impl Membership {
    pub const STATUS_INVITER: &'static str = "inviter";
    pub const STATUS_ACCEPTED: &'static str = "accepted";
    pub const STATUS_PENDING: &'static str = "pending";

    /// 只有已加入小组的成员才计入宽限期扣除
    pub fn is_active(&self) -> bool {
        self.membership_status == Self::STATUS_INVITER
            || self.membership_status == Self::STATUS_ACCEPTED
    }
}

/// 一次收取的仓库版本
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub grouping_id: i64,
    pub revision_identifier: String,
    pub revision_timestamp: Option<chrono::DateTime<chrono::Utc>>,
    pub submission_version: i32,
    pub version_used: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 在同一事务中读取的提交上下文：结果按创建顺序排列，第一个为原始批改
#[derive(Debug, Clone)]
pub struct SubmissionContext {
    pub submission: Submission,
    pub grouping: Grouping,
    pub assignment: Assignment,
    pub results: Vec<GradingResult>,
}

/// 提交列表中一个小组的概况
#[derive(Debug, Clone)]
pub struct GroupingOverview {
    pub grouping: Grouping,
    /// 当前使用的提交版本
    pub submission: Option<Submission>,
    pub results: Vec<GradingResult>,
    pub tags: Vec<Tag>,
    pub grace_units: i64,
}
