/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notification::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notification::Recipient).uuid().not_null())
                    .col(ColumnDef::new(Notification::Actor).uuid().not_null())
                    .col(ColumnDef::new(Notification::Kind).integer().not_null())
                    .col(ColumnDef::new(Notification::Status).integer().not_null())
                    .col(ColumnDef::new(Notification::Project).uuid().not_null())
                    .col(ColumnDef::new(Notification::Commit).uuid())
                    .col(
                        ColumnDef::new(Notification::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notification-recipient")
                            .from(Notification::Table, Notification::Recipient)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notification-actor")
                            .from(Notification::Table, Notification::Actor)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notification-project")
                            .from(Notification::Table, Notification::Project)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notification-commit")
                            .from(Notification::Table, Notification::Commit)
                            .to(Commit::Table, Commit::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One pending invite per (recipient, project). Partial indexes are
        // not expressible through the schema builder, so raw SQL it is.
        // Kind 0 = invite, status 0 = pending; commit/comment notifications
        // repeat per event and must stay out of this index.
        manager
            .get_connection()
            .execute_unprepared(
                r#"CREATE UNIQUE INDEX "idx-notification-pending-invite"
                   ON "notification" ("recipient", "project")
                   WHERE "kind" = 0 AND "status" = 0"#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Notification {
    Table,
    Id,
    Recipient,
    Actor,
    Kind,
    Status,
    Project,
    Commit,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Commit {
    Table,
    Id,
}
