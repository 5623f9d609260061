/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::Utc;
use atelier_core::types::*;
use entity::notification::NotificationKind;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::endpoints::notify_members;
use crate::error::{WebError, WebResult};

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeCommentRequest {
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeCommentResponse {
    pub comment_id: Uuid,
}

pub async fn post_comment(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((project_id, commit_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<MakeCommentRequest>,
) -> WebResult<Json<MakeCommentResponse>> {
    let content = body.content.trim();

    if content.is_empty() {
        return Err(WebError::BadRequest("Comment must not be empty".to_string()));
    }

    let project = EProject::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let commit = ECommit::find_by_id(commit_id)
        .one(&state.db)
        .await?
        .filter(|c| c.project == project.id)
        .ok_or_else(|| WebError::not_found("Commit"))?;

    let txn = state.db.begin().await?;

    let comment = AComment {
        id: Set(Uuid::new_v4()),
        commit: Set(commit.id),
        content: Set(content.to_string()),
        created_by: Set(user.id),
        created_at: Set(Utc::now().naive_utc()),
    };

    let comment = comment.insert(&txn).await?;

    notify_members(
        &txn,
        &project,
        user.id,
        NotificationKind::Comment,
        Some(commit.id),
        comment.created_at,
    )
    .await?;

    txn.commit().await?;

    Ok(Json(MakeCommentResponse {
        comment_id: comment.id,
    }))
}
