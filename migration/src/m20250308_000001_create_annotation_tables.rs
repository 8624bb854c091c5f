use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_grading_tables::{Assignments, Criteria, Results};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 批注分类表，可关联一个 flexible 评分标准用于扣分
        manager
            .create_table(
                Table::create()
                    .table(AnnotationCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnnotationCategories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AnnotationCategories::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AnnotationCategories::AnnotationCategoryName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AnnotationCategories::FlexibleCriterionId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AnnotationCategories::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                AnnotationCategories::Table,
                                AnnotationCategories::AssignmentId,
                            )
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                AnnotationCategories::Table,
                                AnnotationCategories::FlexibleCriterionId,
                            )
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 批注文本表
        manager
            .create_table(
                Table::create()
                    .table(AnnotationTexts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnnotationTexts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AnnotationTexts::AnnotationCategoryId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(AnnotationTexts::Content).text().not_null())
                    .col(ColumnDef::new(AnnotationTexts::Deduction).double().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(AnnotationTexts::Table, AnnotationTexts::AnnotationCategoryId)
                            .to(AnnotationCategories::Table, AnnotationCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 批注表
        manager
            .create_table(
                Table::create()
                    .table(Annotations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Annotations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Annotations::ResultId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Annotations::AnnotationTextId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Annotations::SubmissionFile)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Annotations::LineStart).integer().not_null())
                    .col(ColumnDef::new(Annotations::LineEnd).integer().not_null())
                    .col(
                        ColumnDef::new(Annotations::AnnotationNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Annotations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Annotations::Table, Annotations::ResultId)
                            .to(Results::Table, Results::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Annotations::Table, Annotations::AnnotationTextId)
                            .to(AnnotationTexts::Table, AnnotationTexts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_annotations_result_id")
                    .table(Annotations::Table)
                    .col(Annotations::ResultId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Annotations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AnnotationTexts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AnnotationCategories::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum AnnotationCategories {
    #[sea_orm(iden = "annotation_categories")]
    Table,
    Id,
    AssignmentId,
    AnnotationCategoryName,
    FlexibleCriterionId,
    Position,
}

#[derive(DeriveIden)]
enum AnnotationTexts {
    #[sea_orm(iden = "annotation_texts")]
    Table,
    Id,
    AnnotationCategoryId,
    Content,
    Deduction,
}

#[derive(DeriveIden)]
enum Annotations {
    #[sea_orm(iden = "annotations")]
    Table,
    Id,
    ResultId,
    AnnotationTextId,
    SubmissionFile,
    LineStart,
    LineEnd,
    AnnotationNumber,
    CreatedAt,
}
