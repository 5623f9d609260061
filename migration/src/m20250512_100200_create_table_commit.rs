/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Commit::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Commit::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Commit::Project).uuid().not_null())
                    .col(ColumnDef::new(Commit::Message).string().not_null())
                    .col(ColumnDef::new(Commit::Image).text().not_null())
                    .col(ColumnDef::new(Commit::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Commit::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-commit-project")
                            .from(Commit::Table, Commit::Project)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-commit-created_by")
                            .from(Commit::Table, Commit::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Commit::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Commit {
    Table,
    Id,
    Project,
    Message,
    Image,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
