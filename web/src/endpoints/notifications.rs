/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::extract::{Path, State};
use axum::{Extension, Json};
use atelier_core::database::get_membership;
use atelier_core::types::*;
use entity::notification::{NotificationKind, NotificationStatus};
use entity::project_user::ProjectUserKind;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait, TransactionTrait};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{WebError, WebResult};

pub async fn patch_respond(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((notification_id, response)): Path<(Uuid, String)>,
) -> WebResult<Json<BaseResponse<String>>> {
    let notification = ENotification::find_by_id(notification_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Notification"))?;

    if notification.recipient != user.id {
        return Err(WebError::Forbidden(
            "Notification belongs to another user".to_string(),
        ));
    }

    if notification.kind != NotificationKind::Invite
        || notification.status != NotificationStatus::Pending
    {
        return Err(WebError::BadRequest(
            "Notification is not a pending invitation".to_string(),
        ));
    }

    let project_id = notification.project;

    let message = match response.as_str() {
        "accept" => {
            // Membership row and the status flip commit together.
            let txn = state.db.begin().await?;

            let mut anotification: ANotification = notification.into();
            anotification.status = Set(NotificationStatus::Accepted);
            anotification.update(&txn).await?;

            if get_membership(&txn, user.id, project_id).await?.is_none() {
                let membership = AProjectUser {
                    id: Set(Uuid::new_v4()),
                    project: Set(project_id),
                    user: Set(user.id),
                    kind: Set(ProjectUserKind::Member),
                };

                membership.insert(&txn).await?;
            }

            txn.commit().await?;
            "Invitation accepted".to_string()
        }

        "decline" => {
            let mut anotification: ANotification = notification.into();
            anotification.status = Set(NotificationStatus::Declined);
            anotification.update(&state.db).await?;

            "Invitation declined".to_string()
        }

        _ => {
            return Err(WebError::BadRequest(
                "Response must be accept or decline".to_string(),
            ));
        }
    };

    let res = BaseResponse {
        error: false,
        message,
    };

    Ok(Json(res))
}
