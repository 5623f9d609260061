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
                    .table(ProjectUser::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectUser::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProjectUser::Project).uuid().not_null())
                    .col(ColumnDef::new(ProjectUser::User).uuid().not_null())
                    .col(ColumnDef::new(ProjectUser::Kind).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_user-project")
                            .from(ProjectUser::Table, ProjectUser::Project)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_user-user")
                            .from(ProjectUser::Table, ProjectUser::User)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-project_user-edge")
                    .table(ProjectUser::Table)
                    .col(ProjectUser::Project)
                    .col(ProjectUser::User)
                    .col(ProjectUser::Kind)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectUser::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProjectUser {
    Table,
    Id,
    Project,
    User,
    Kind,
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
