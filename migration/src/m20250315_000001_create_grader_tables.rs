use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_grading_tables::{Assignments, Criteria, Groupings};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 阅卷人表
        manager
            .create_table(
                Table::create()
                    .table(Graders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Graders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Graders::UserName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Graders::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 阅卷人负责的小组
        manager
            .create_table(
                Table::create()
                    .table(GraderMemberships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GraderMemberships::GraderId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GraderMemberships::GroupingId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(GraderMemberships::GraderId)
                            .col(GraderMemberships::GroupingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GraderMemberships::Table, GraderMemberships::GraderId)
                            .to(Graders::Table, Graders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GraderMemberships::Table, GraderMemberships::GroupingId)
                            .to(Groupings::Table, Groupings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 阅卷人负责的评分标准
        manager
            .create_table(
                Table::create()
                    .table(CriterionGraderAssociations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CriterionGraderAssociations::GraderId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CriterionGraderAssociations::CriterionId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CriterionGraderAssociations::GraderId)
                            .col(CriterionGraderAssociations::CriterionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                CriterionGraderAssociations::Table,
                                CriterionGraderAssociations::GraderId,
                            )
                            .to(Graders::Table, Graders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                CriterionGraderAssociations::Table,
                                CriterionGraderAssociations::CriterionId,
                            )
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // SQLite 每条 ALTER 只能改一列
        manager
            .alter_table(
                Table::alter()
                    .table(Assignments::Table)
                    .add_column(
                        ColumnDef::new(AssignmentGraderOptions::AssignGradersToCriteria)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Assignments::Table)
                    .add_column(
                        ColumnDef::new(AssignmentGraderOptions::HideUnassignedCriteria)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Assignments::Table)
                    .drop_column(AssignmentGraderOptions::HideUnassignedCriteria)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Assignments::Table)
                    .drop_column(AssignmentGraderOptions::AssignGradersToCriteria)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(CriterionGraderAssociations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GraderMemberships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Graders::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Graders {
    #[sea_orm(iden = "graders")]
    Table,
    Id,
    UserName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GraderMemberships {
    #[sea_orm(iden = "grader_memberships")]
    Table,
    GraderId,
    GroupingId,
}

#[derive(DeriveIden)]
enum CriterionGraderAssociations {
    #[sea_orm(iden = "criterion_grader_associations")]
    Table,
    GraderId,
    CriterionId,
}

#[derive(DeriveIden)]
enum AssignmentGraderOptions {
    AssignGradersToCriteria,
    HideUnassignedCriteria,
}
