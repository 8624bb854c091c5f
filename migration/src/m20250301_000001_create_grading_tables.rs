use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignments::ShortIdentifier)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(
                        ColumnDef::new(Assignments::AllowRemarks)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Assignments::RemarkDueDate)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::AnonymizeGroups)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生表（宽限额度按学生计）
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::UserName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Students::GraceCredits)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 分组表
        manager
            .create_table(
                Table::create()
                    .table(Groupings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groupings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Groupings::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Groupings::GroupName).string().not_null())
                    .col(ColumnDef::new(Groupings::RepoName).string().not_null())
                    .col(
                        ColumnDef::new(Groupings::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Groupings::Table, Groupings::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 分组成员表
        manager
            .create_table(
                Table::create()
                    .table(Memberships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Memberships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Memberships::GroupingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Memberships::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Memberships::MembershipStatus)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Memberships::Table, Memberships::GroupingId)
                            .to(Groupings::Table, Groupings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Memberships::Table, Memberships::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 宽限期扣除表
        manager
            .create_table(
                Table::create()
                    .table(GracePeriodDeductions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GracePeriodDeductions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GracePeriodDeductions::MembershipId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GracePeriodDeductions::Deduction)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GracePeriodDeductions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                GracePeriodDeductions::Table,
                                GracePeriodDeductions::MembershipId,
                            )
                            .to(Memberships::Table, Memberships::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::GroupingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::RevisionIdentifier)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::RevisionTimestamp)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::SubmissionVersion)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::VersionUsed)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Submissions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::GroupingId)
                            .to(Groupings::Table, Groupings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 评分结果表
        manager
            .create_table(
                Table::create()
                    .table(Results::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Results::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Results::SubmissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Results::MarkingState).string().not_null())
                    .col(
                        ColumnDef::new(Results::TotalMark)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Results::OverallComment).text().null())
                    .col(
                        ColumnDef::new(Results::ReleasedToStudents)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Results::IsRemark)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Results::RemarkRequestTimestamp)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Results::RemarkRequestText).text().null())
                    .col(ColumnDef::new(Results::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Results::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 评分标准表（rubric / flexible / checkbox 共用，criterion_type 区分）
        manager
            .create_table(
                Table::create()
                    .table(Criteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Criteria::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Criteria::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Criteria::Name).string().not_null())
                    .col(ColumnDef::new(Criteria::CriterionType).string().not_null())
                    .col(
                        ColumnDef::new(Criteria::MaxMark)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Criteria::Weight)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(ColumnDef::new(Criteria::Levels).text().null())
                    .col(
                        ColumnDef::new(Criteria::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Criteria::Table, Criteria::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 分项分数表
        manager
            .create_table(
                Table::create()
                    .table(Marks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Marks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Marks::ResultId).big_integer().not_null())
                    .col(ColumnDef::new(Marks::MarkableId).big_integer().not_null())
                    .col(ColumnDef::new(Marks::MarkableType).string().not_null())
                    .col(ColumnDef::new(Marks::Mark).double().null())
                    .col(ColumnDef::new(Marks::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Marks::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Marks::Table, Marks::ResultId)
                            .to(Results::Table, Results::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Marks::Table, Marks::MarkableId)
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 附加分表
        manager
            .create_table(
                Table::create()
                    .table(ExtraMarks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExtraMarks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExtraMarks::ResultId).big_integer().not_null())
                    .col(ColumnDef::new(ExtraMarks::ExtraMark).double().not_null())
                    .col(ColumnDef::new(ExtraMarks::Unit).string().not_null())
                    .col(ColumnDef::new(ExtraMarks::Description).text().null())
                    .col(
                        ColumnDef::new(ExtraMarks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExtraMarks::Table, ExtraMarks::ResultId)
                            .to(Results::Table, Results::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 标签表
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Tags::Description).text().null())
                    .col(ColumnDef::new(Tags::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 分组-标签关联表
        manager
            .create_table(
                Table::create()
                    .table(GroupingTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupingTags::GroupingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GroupingTags::TagId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(GroupingTags::GroupingId)
                            .col(GroupingTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupingTags::Table, GroupingTags::GroupingId)
                            .to(Groupings::Table, Groupings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupingTags::Table, GroupingTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_marks_result_markable")
                    .table(Marks::Table)
                    .col(Marks::ResultId)
                    .col(Marks::MarkableId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_results_submission_id")
                    .table(Results::Table)
                    .col(Results::SubmissionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_grouping_id")
                    .table(Submissions::Table)
                    .col(Submissions::GroupingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_extra_marks_result_id")
                    .table(ExtraMarks::Table)
                    .col(ExtraMarks::ResultId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(GroupingTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExtraMarks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Marks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Criteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Results::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GracePeriodDeductions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Memberships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groupings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    ShortIdentifier,
    Description,
    AllowRemarks,
    RemarkDueDate,
    AnonymizeGroups,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    UserName,
    GraceCredits,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Groupings {
    #[sea_orm(iden = "groupings")]
    Table,
    Id,
    AssignmentId,
    GroupName,
    RepoName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Memberships {
    #[sea_orm(iden = "memberships")]
    Table,
    Id,
    GroupingId,
    StudentId,
    MembershipStatus,
}

#[derive(DeriveIden)]
enum GracePeriodDeductions {
    #[sea_orm(iden = "grace_period_deductions")]
    Table,
    Id,
    MembershipId,
    Deduction,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    GroupingId,
    RevisionIdentifier,
    RevisionTimestamp,
    SubmissionVersion,
    VersionUsed,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Results {
    #[sea_orm(iden = "results")]
    Table,
    Id,
    SubmissionId,
    MarkingState,
    TotalMark,
    OverallComment,
    ReleasedToStudents,
    IsRemark,
    RemarkRequestTimestamp,
    RemarkRequestText,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Criteria {
    #[sea_orm(iden = "criteria")]
    Table,
    Id,
    AssignmentId,
    Name,
    CriterionType,
    MaxMark,
    Weight,
    Levels,
    Position,
}

#[derive(DeriveIden)]
enum Marks {
    #[sea_orm(iden = "marks")]
    Table,
    Id,
    ResultId,
    MarkableId,
    MarkableType,
    Mark,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExtraMarks {
    #[sea_orm(iden = "extra_marks")]
    Table,
    Id,
    ResultId,
    ExtraMark,
    Unit,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tags {
    #[sea_orm(iden = "tags")]
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupingTags {
    #[sea_orm(iden = "grouping_tags")]
    Table,
    GroupingId,
    TagId,
}
