//! 批改结果实体

use sea_orm::entity::prelude::*;

use crate::utils::decimal::decimal_from_f64;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub marking_state: String,
    pub total_mark: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub overall_comment: Option<String>,
    pub released_to_students: bool,
    pub is_remark: bool,
    pub remark_request_timestamp: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub remark_request_text: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
    #[sea_orm(has_many = "super::marks::Entity")]
    Marks,
    #[sea_orm(has_many = "super::extra_marks::Entity")]
    ExtraMarks,
    #[sea_orm(has_many = "super::annotations::Entity")]
    Annotations,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::marks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marks.def()
    }
}

impl Related<super::extra_marks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExtraMarks.def()
    }
}

impl Related<super::annotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Annotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_result(
        self,
    ) -> crate::errors::Result<crate::models::results::entities::GradingResult> {
        use crate::models::results::entities::{GradingResult, MarkingState};
        use chrono::{DateTime, Utc};

        Ok(GradingResult {
            id: self.id,
            submission_id: self.submission_id,
            marking_state: self.marking_state.parse::<MarkingState>()?,
            total_mark: decimal_from_f64(self.total_mark)?,
            overall_comment: self.overall_comment,
            released_to_students: self.released_to_students,
            is_remark: self.is_remark,
            remark_request_timestamp: self
                .remark_request_timestamp
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            remark_request_text: self.remark_request_text,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
