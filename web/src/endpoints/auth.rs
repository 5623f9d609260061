/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use atelier_core::consts::*;
use atelier_core::input::check_username;
use atelier_core::types::*;
use password_auth::{generate_hash, verify_password};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, SqlErr};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::authorization::{encode_jwt, update_last_login};
use crate::error::{WebError, WebResult};

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeUserRequest {
    pub username: String,
    pub password: String,
    pub password2: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn post_register(
    state: State<Arc<ServerState>>,
    Json(body): Json<MakeUserRequest>,
) -> WebResult<(StatusCode, Json<TokenResponse>)> {
    if state.cli.disable_registration {
        return Err(WebError::registration_disabled());
    }

    if body.password != body.password2 {
        return Err(WebError::BadRequest(
            "Password and confirmation password do not match".to_string(),
        ));
    }

    check_username(&body.username).map_err(WebError::BadRequest)?;

    let existing = EUser::find()
        .filter(CUser::Username.eq(body.username.clone()))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(WebError::already_exists("Username"));
    }

    let user = AUser {
        id: Set(Uuid::new_v4()),
        username: Set(body.username.clone()),
        password: Set(generate_hash(body.password.clone())),
        profile_image: Set(None),
        last_login_at: Set(*NULL_TIME),
        created_at: Set(Utc::now().naive_utc()),
    };

    // The find above is not atomic with the insert; a concurrent duplicate
    // lands on the unique username index instead.
    let user = match user.insert(&state.db).await {
        Ok(user) => user,
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                return Err(WebError::already_exists("Username"));
            }
            _ => return Err(err.into()),
        },
    };

    let token = encode_jwt(&state, user.id)?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

pub async fn post_login(
    state: State<Arc<ServerState>>,
    Json(body): Json<MakeLoginRequest>,
) -> WebResult<Json<TokenResponse>> {
    let user = EUser::find()
        .filter(CUser::Username.eq(body.username.clone()))
        .one(&state.db)
        .await?
        .ok_or_else(WebError::invalid_credentials)?;

    verify_password(body.password, &user.password).map_err(|_| WebError::invalid_credentials())?;

    let token = encode_jwt(&state, user.id)?;

    update_last_login(&state, user)
        .await
        .map_err(|_| WebError::InternalServerError("Failed to update user".to_string()))?;

    Ok(Json(TokenResponse { token }))
}

pub async fn post_logout(
    _state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<String>>> {
    // Tokens are stateless; the client drops its copy and that is that.
    let res = BaseResponse {
        error: false,
        message: "Logout Successfully".to_string(),
    };

    Ok(Json(res))
}
