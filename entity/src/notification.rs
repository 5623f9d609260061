/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq, Eq, DeriveActiveEnum, EnumIter, Deserialize, Serialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[sea_orm(num_value = 0)]
    Invite,
    #[sea_orm(num_value = 1)]
    Commit,
    #[sea_orm(num_value = 2)]
    Comment,
}

/// Accepted/Declined are only ever reached by invites; commit and comment
/// notifications stay pending until superseded.
#[derive(Debug, Clone, PartialEq, Eq, DeriveActiveEnum, EnumIter, Deserialize, Serialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[sea_orm(num_value = 0)]
    Pending,
    #[sea_orm(num_value = 1)]
    Accepted,
    #[sea_orm(num_value = 2)]
    Declined,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub recipient: Uuid,
    pub actor: Uuid,
    pub kind: NotificationKind,
    pub status: NotificationStatus,
    pub project: Uuid,
    pub commit: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Recipient",
        to = "super::user::Column::Id"
    )]
    Recipient,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Actor",
        to = "super::user::Column::Id"
    )]
    Actor,
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::Project",
        to = "super::project::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::commit::Entity",
        from = "Column::Commit",
        to = "super::commit::Column::Id"
    )]
    Commit,
}

impl ActiveModelBehavior for ActiveModel {}
