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
use atelier_core::database::{get_project_member_ids, get_star};
use atelier_core::input::{check_image, check_text_field, parse_tags};
use atelier_core::types::*;
use entity::project_user::ProjectUserKind;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{WebError, WebResult};

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeProjectRequest {
    pub project_name: String,
    pub description: String,
    pub tags: String,
    pub commit_message: String,
    pub commit_image: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeProjectResponse {
    pub project_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectAction {
    ToggleVisibility,
    ToggleStar,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchProjectRequest {
    pub action: ProjectAction,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProjectDetailsResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub visible: bool,
    pub star_count: i32,
    pub created_by: Uuid,
    pub created_at: chrono::NaiveDateTime,
    pub latest_commit_image: Option<String>,
    pub members: Vec<ListItem>,
    pub starred: bool,
}

pub async fn post_makeproject(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Json(body): Json<MakeProjectRequest>,
) -> WebResult<(StatusCode, Json<MakeProjectResponse>)> {
    check_image(&body.commit_image, state.cli.max_image_bytes).map_err(WebError::BadRequest)?;
    check_text_field("Project name", &body.project_name, MAX_PROJECT_NAME_LEN)
        .map_err(WebError::BadRequest)?;
    check_text_field("Commit message", &body.commit_message, MAX_COMMIT_MESSAGE_LEN)
        .map_err(WebError::BadRequest)?;

    let tags = parse_tags(&body.tags);
    let now = Utc::now().naive_utc();

    // Project and first commit land together or not at all.
    let txn = state.db.begin().await?;

    let project = AProject {
        id: Set(Uuid::new_v4()),
        name: Set(body.project_name),
        description: Set(body.description),
        visible: Set(false),
        tags: Set(tags),
        star_count: Set(0),
        created_by: Set(user.id),
        created_at: Set(now),
    };

    let project = project.insert(&txn).await?;

    let commit = ACommit {
        id: Set(Uuid::new_v4()),
        project: Set(project.id),
        message: Set(body.commit_message),
        image: Set(body.commit_image),
        created_by: Set(user.id),
        created_at: Set(now),
    };

    commit.insert(&txn).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(MakeProjectResponse {
            project_id: project.id,
        }),
    ))
}

pub async fn get_project(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(project_id): Path<Uuid>,
) -> WebResult<Json<ProjectDetailsResponse>> {
    let project = EProject::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let latest_commit = ECommit::find()
        .filter(CCommit::Project.eq(project.id))
        .order_by_desc(CCommit::CreatedAt)
        .one(&state.db)
        .await?;

    let mut members = Vec::new();

    for member_id in get_project_member_ids(&state.db, project.id).await? {
        if let Some(member) = EUser::find_by_id(member_id).one(&state.db).await? {
            members.push(ListItem {
                id: member.id,
                name: member.username,
            });
        }
    }

    let starred = get_star(&state.db, user.id, project.id).await?.is_some();

    Ok(Json(ProjectDetailsResponse {
        id: project.id,
        name: project.name,
        description: project.description,
        tags: project.tags,
        visible: project.visible,
        star_count: project.star_count,
        created_by: project.created_by,
        created_at: project.created_at,
        latest_commit_image: latest_commit.map(|c| c.image),
        members,
        starred,
    }))
}

pub async fn patch_project(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(project_id): Path<Uuid>,
    Json(body): Json<PatchProjectRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    let project = EProject::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let message = match body.action {
        ProjectAction::ToggleVisibility => {
            if project.created_by != user.id {
                return Err(WebError::Forbidden(
                    "Visibility can only be changed by the project creator".to_string(),
                ));
            }

            let visible = !project.visible;

            let mut aproject: AProject = project.into();
            aproject.visible = Set(visible);
            aproject.update(&state.db).await?;

            if visible {
                "Project is now visible".to_string()
            } else {
                "Project is now hidden".to_string()
            }
        }

        ProjectAction::ToggleStar => {
            // Row toggle and counter update are one transaction; the counter
            // arithmetic runs in the database so concurrent toggles cannot
            // lose updates.
            let txn = state.db.begin().await?;

            let message = match get_star(&txn, user.id, project.id).await? {
                Some(star) => {
                    star.delete(&txn).await?;

                    EProject::update_many()
                        .col_expr(
                            CProject::StarCount,
                            Expr::col(CProject::StarCount).sub(1),
                        )
                        .filter(CProject::Id.eq(project.id))
                        .exec(&txn)
                        .await?;

                    "Star removed".to_string()
                }

                None => {
                    let star = AProjectUser {
                        id: Set(Uuid::new_v4()),
                        project: Set(project.id),
                        user: Set(user.id),
                        kind: Set(ProjectUserKind::Star),
                    };

                    star.insert(&txn).await?;

                    EProject::update_many()
                        .col_expr(
                            CProject::StarCount,
                            Expr::col(CProject::StarCount).add(1),
                        )
                        .filter(CProject::Id.eq(project.id))
                        .exec(&txn)
                        .await?;

                    "Star added".to_string()
                }
            };

            txn.commit().await?;
            message
        }
    };

    let res = BaseResponse {
        error: false,
        message,
    };

    Ok(Json(res))
}

pub async fn delete_project(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(project_id): Path<Uuid>,
) -> WebResult<Json<BaseResponse<String>>> {
    let project = EProject::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    if project.created_by != user.id {
        return Err(WebError::Forbidden(
            "Project can only be deleted by its creator".to_string(),
        ));
    }

    // Commits, comments, memberships and notifications follow via the
    // foreign key cascades.
    let aproject: AProject = project.into();
    aproject.delete(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Project deleted".to_string(),
    };

    Ok(Json(res))
}
