/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use entity::notification::{NotificationKind, NotificationStatus};
use entity::project_user::ProjectUserKind;
use migration::Migrator;
use sea_orm::{
    ColumnTrait, Condition, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter,
};
use sea_orm_migration::prelude::*;
use std::time::Duration;
use tracing::log::LevelFilter;
use uuid::Uuid;

use super::types::*;

pub async fn connect_db(cli: &Cli) -> Result<DatabaseConnection> {
    let db_url = if let Some(file) = &cli.database_url_file {
        std::fs::read_to_string(file).context("Failed to read database url from file")?
    } else if let Some(url) = &cli.database_url {
        url.clone()
    } else {
        anyhow::bail!("No database url provided")
    };

    let mut opt = ConnectOptions::new(db_url);

    // Only enable SQL logging at debug level
    if cli.log_level == "debug" {
        opt.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    } else {
        opt.sqlx_logging(false);
    }

    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8));

    let db = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    Ok(db)
}

pub async fn get_star<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<Option<MProjectUser>, DbErr> {
    EProjectUser::find()
        .filter(
            Condition::all()
                .add(CProjectUser::User.eq(user_id))
                .add(CProjectUser::Project.eq(project_id))
                .add(CProjectUser::Kind.eq(ProjectUserKind::Star)),
        )
        .one(db)
        .await
}

pub async fn get_membership<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<Option<MProjectUser>, DbErr> {
    EProjectUser::find()
        .filter(
            Condition::all()
                .add(CProjectUser::User.eq(user_id))
                .add(CProjectUser::Project.eq(project_id))
                .add(CProjectUser::Kind.eq(ProjectUserKind::Member)),
        )
        .one(db)
        .await
}

pub async fn get_project_member_ids<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
) -> Result<Vec<Uuid>, DbErr> {
    let members = EProjectUser::find()
        .filter(
            Condition::all()
                .add(CProjectUser::Project.eq(project_id))
                .add(CProjectUser::Kind.eq(ProjectUserKind::Member)),
        )
        .all(db)
        .await?;

    Ok(members.into_iter().map(|m| m.user).collect())
}

pub async fn find_pending_invite<C: ConnectionTrait>(
    db: &C,
    recipient: Uuid,
    project_id: Uuid,
) -> Result<Option<MNotification>, DbErr> {
    ENotification::find()
        .filter(
            Condition::all()
                .add(CNotification::Recipient.eq(recipient))
                .add(CNotification::Project.eq(project_id))
                .add(CNotification::Kind.eq(NotificationKind::Invite))
                .add(CNotification::Status.eq(NotificationStatus::Pending)),
        )
        .one(db)
        .await
}
