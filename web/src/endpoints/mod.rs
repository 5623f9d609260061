/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod auth;
pub mod comments;
pub mod commits;
pub mod home;
pub mod invites;
pub mod notifications;
pub mod profile;
pub mod projects;

use chrono::NaiveDateTime;
use atelier_core::database::get_project_member_ids;
use atelier_core::types::*;
use entity::notification::{NotificationKind, NotificationStatus};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use axum::extract::Json;

pub async fn handle_404() -> WebError {
    WebError::NotFound("Not Found".to_string())
}

pub async fn get_health() -> WebResult<Json<BaseResponse<String>>> {
    let res = BaseResponse {
        error: false,
        message: "200 ALIVE".to_string(),
    };

    Ok(Json(res))
}

/// Fans a commit/comment event out to every project member except the
/// actor. Runs on the caller's transaction so the event and its
/// notifications land atomically.
pub(crate) async fn notify_members<C: ConnectionTrait>(
    db: &C,
    project: &MProject,
    actor: Uuid,
    kind: NotificationKind,
    commit: Option<Uuid>,
    created_at: NaiveDateTime,
) -> Result<(), DbErr> {
    for member in get_project_member_ids(db, project.id).await? {
        if member == actor {
            continue;
        }

        let notification = ANotification {
            id: Set(Uuid::new_v4()),
            recipient: Set(member),
            actor: Set(actor),
            kind: Set(kind.clone()),
            status: Set(NotificationStatus::Pending),
            project: Set(project.id),
            commit: Set(commit),
            created_at: Set(created_at),
        };

        notification.insert(db).await?;
    }

    Ok(())
}
