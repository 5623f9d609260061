/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::extract::{Path, State};
use axum::{Extension, Json};
use atelier_core::input::check_image;
use atelier_core::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{WebError, WebResult};

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateProfileRequest {
    pub profile_image: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProfileProject {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub latest_commit_image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub username: String,
    pub profile_image: Option<String>,
    pub projects: Vec<ProfileProject>,
}

pub async fn get_profile(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(user_id): Path<Uuid>,
) -> WebResult<Json<ProfileResponse>> {
    let target = if user_id == user.id {
        user
    } else {
        EUser::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| WebError::not_found("User"))?
    };

    let projects = EProject::find()
        .filter(CProject::CreatedBy.eq(target.id))
        .order_by_desc(CProject::CreatedAt)
        .all(&state.db)
        .await?;

    let mut profile_projects = Vec::new();

    for project in projects {
        let latest_commit = ECommit::find()
            .filter(CCommit::Project.eq(project.id))
            .order_by_desc(CCommit::CreatedAt)
            .one(&state.db)
            .await?;

        profile_projects.push(ProfileProject {
            id: project.id,
            name: project.name,
            created_by: project.created_by,
            latest_commit_image: latest_commit.map(|c| c.image),
        });
    }

    Ok(Json(ProfileResponse {
        user_id: target.id,
        username: target.username,
        profile_image: target.profile_image,
        projects: profile_projects,
    }))
}

pub async fn post_profile(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateProfileRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    if user.id != user_id {
        return Err(WebError::Forbidden(
            "Profile can only be updated by its owner".to_string(),
        ));
    }

    check_image(&body.profile_image, state.cli.max_image_bytes).map_err(WebError::BadRequest)?;

    let mut auser: AUser = user.into();
    auser.profile_image = Set(Some(body.profile_image));
    auser.update(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Profile image updated".to_string(),
    };

    Ok(Json(res))
}
