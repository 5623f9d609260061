/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use atelier_core::consts::*;
use atelier_core::input::{check_image, check_text_field};
use atelier_core::types::*;
use entity::notification::NotificationKind;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::endpoints::notify_members;
use crate::error::{WebError, WebResult};

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeCommitRequest {
    pub commit_message: String,
    pub commit_image: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeCommitResponse {
    pub commit_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CommitSummary {
    pub id: Uuid,
    pub message: String,
    pub image: String,
    pub created_by: Uuid,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CommitsResponse {
    pub project: Uuid,
    pub commits: Vec<CommitSummary>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CommentItem {
    pub id: Uuid,
    pub content: String,
    pub created_at: chrono::NaiveDateTime,
    pub user: ListItem,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CommitDetailsResponse {
    pub id: Uuid,
    pub project: Uuid,
    pub message: String,
    pub image: String,
    pub created_by: Uuid,
    pub created_at: chrono::NaiveDateTime,
    pub comments: Vec<CommentItem>,
}

pub async fn post_commit(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(project_id): Path<Uuid>,
    Json(body): Json<MakeCommitRequest>,
) -> WebResult<(StatusCode, Json<MakeCommitResponse>)> {
    check_text_field("Commit message", &body.commit_message, MAX_COMMIT_MESSAGE_LEN)
        .map_err(WebError::BadRequest)?;
    check_image(&body.commit_image, state.cli.max_image_bytes).map_err(WebError::BadRequest)?;

    let project = EProject::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let txn = state.db.begin().await?;

    let commit = ACommit {
        id: Set(Uuid::new_v4()),
        project: Set(project.id),
        message: Set(body.commit_message),
        image: Set(body.commit_image),
        created_by: Set(user.id),
        created_at: Set(Utc::now().naive_utc()),
    };

    let commit = commit.insert(&txn).await?;

    notify_members(
        &txn,
        &project,
        user.id,
        NotificationKind::Commit,
        Some(commit.id),
        commit.created_at,
    )
    .await?;

    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(MakeCommitResponse { commit_id: commit.id }),
    ))
}

pub async fn get_commits(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path(project_id): Path<Uuid>,
) -> WebResult<Json<CommitsResponse>> {
    let project = EProject::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let commits = ECommit::find()
        .filter(CCommit::Project.eq(project.id))
        .order_by_desc(CCommit::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|c| CommitSummary {
            id: c.id,
            message: c.message,
            image: c.image,
            created_by: c.created_by,
            created_at: c.created_at,
        })
        .collect();

    Ok(Json(CommitsResponse {
        project: project.id,
        commits,
    }))
}

pub async fn get_commit(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path((project_id, commit_id)): Path<(Uuid, Uuid)>,
) -> WebResult<Json<CommitDetailsResponse>> {
    let project = EProject::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let commit = ECommit::find_by_id(commit_id)
        .one(&state.db)
        .await?
        .filter(|c| c.project == project.id)
        .ok_or_else(|| WebError::not_found("Commit"))?;

    let comments = EComment::find()
        .filter(CComment::Commit.eq(commit.id))
        .order_by_asc(CComment::CreatedAt)
        .all(&state.db)
        .await?;

    let mut comment_items = Vec::new();

    for comment in comments {
        let author = EUser::find_by_id(comment.created_by)
            .one(&state.db)
            .await?;

        let user = match author {
            Some(author) => ListItem {
                id: author.id,
                name: author.username,
            },
            None => continue,
        };

        comment_items.push(CommentItem {
            id: comment.id,
            content: comment.content,
            created_at: comment.created_at,
            user,
        });
    }

    Ok(Json(CommitDetailsResponse {
        id: commit.id,
        project: project.id,
        message: commit.message,
        image: commit.image,
        created_by: commit.created_by,
        created_at: commit.created_at,
        comments: comment_items,
    }))
}
