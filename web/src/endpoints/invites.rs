/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::Utc;
use atelier_core::database::{find_pending_invite, get_membership, get_project_member_ids};
use atelier_core::types::*;
use entity::notification::{NotificationKind, NotificationStatus};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, SqlErr};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{WebError, WebResult};

#[derive(Serialize, Deserialize, Debug)]
pub struct InviteCandidate {
    pub id: Uuid,
    pub username: String,
    pub profile_image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InvitePageResponse {
    pub project: Uuid,
    pub members: Vec<ListItem>,
    pub users: Vec<InviteCandidate>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeInviteRequest {
    pub user_id: Uuid,
}

pub async fn get_invite(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
) -> WebResult<Json<InvitePageResponse>> {
    let project = EProject::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let member_ids = get_project_member_ids(&state.db, project.id).await?;

    let mut members = Vec::new();

    for member_id in &member_ids {
        if let Some(member) = EUser::find_by_id(*member_id).one(&state.db).await? {
            members.push(ListItem {
                id: member.id,
                name: member.username,
            });
        }
    }

    // Candidates only materialize for an explicit search term; the user
    // table is never enumerated wholesale.
    let users = match query.get("search").filter(|s| !s.is_empty()) {
        Some(search) => EUser::find()
            .filter(CUser::Username.contains(search))
            .all(&state.db)
            .await?
            .into_iter()
            .filter(|u| u.id != user.id && !member_ids.contains(&u.id))
            .map(|u| InviteCandidate {
                id: u.id,
                username: u.username,
                profile_image: u.profile_image,
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(Json(InvitePageResponse {
        project: project.id,
        members,
        users,
    }))
}

pub async fn post_invite(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(project_id): Path<Uuid>,
    Json(body): Json<MakeInviteRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    let project = EProject::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    if body.user_id == user.id {
        return Err(WebError::BadRequest(
            "Users cannot invite themselves".to_string(),
        ));
    }

    let target = EUser::find_by_id(body.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("User"))?;

    if target.id == project.created_by
        || get_membership(&state.db, target.id, project.id)
            .await?
            .is_some()
    {
        return Err(WebError::already_exists("Membership"));
    }

    // A pending invite already covers the intent; repeating the request
    // changes nothing.
    if find_pending_invite(&state.db, target.id, project.id)
        .await?
        .is_some()
    {
        let res = BaseResponse {
            error: false,
            message: "Invitation already pending".to_string(),
        };

        return Ok(Json(res));
    }

    let notification = ANotification {
        id: Set(Uuid::new_v4()),
        recipient: Set(target.id),
        actor: Set(user.id),
        kind: Set(NotificationKind::Invite),
        status: Set(NotificationStatus::Pending),
        project: Set(project.id),
        commit: Set(None),
        created_at: Set(Utc::now().naive_utc()),
    };

    // The partial unique index on pending invites backs the check above;
    // losing a race to a concurrent identical invite is still a no-op.
    if let Err(err) = notification.insert(&state.db).await {
        return match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Ok(Json(BaseResponse {
                error: false,
                message: "Invitation already pending".to_string(),
            })),
            _ => Err(err.into()),
        };
    }

    let res = BaseResponse {
        error: false,
        message: "Invitation sent".to_string(),
    };

    Ok(Json(res))
}
