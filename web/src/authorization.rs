/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::Response;
use axum::middleware::Next;
use chrono::{Duration, Utc};
use atelier_core::input::load_secret;
use atelier_core::types::*;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{WebError, WebResult};

#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize,
    pub iat: usize,
    pub id: Uuid,
}

/// Requires a valid bearer token; the resolved user is attached as a
/// request extension for the handler.
pub async fn authorize(
    state: State<Arc<ServerState>>,
    mut req: Request,
    next: Next,
) -> WebResult<Response<Body>> {
    let token = bearer_token(&req)?
        .ok_or_else(|| WebError::Unauthorized("Authorization header not found".to_string()))?;

    let current_user = lookup_user(&state, &token).await?;

    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Like [`authorize`], but a request without an Authorization header is
/// admitted as the guest identity instead of being rejected. A header that
/// is present must still carry a valid token.
pub async fn identify(
    state: State<Arc<ServerState>>,
    mut req: Request,
    next: Next,
) -> WebResult<Response<Body>> {
    let identity = match bearer_token(&req)? {
        Some(token) => Identity::from(lookup_user(&state, &token).await?),
        None => Identity::guest(),
    };

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> WebResult<Option<String>> {
    let auth_header = match req.headers().get(axum::http::header::AUTHORIZATION) {
        Some(header) => header
            .to_str()
            .map_err(|_| WebError::Unauthorized("Authorization header empty".to_string()))?,
        None => return Ok(None),
    };

    let mut header = auth_header.split_whitespace();

    let (bearer, token) = (header.next(), header.next());

    if bearer != Some("Bearer") {
        return Err(WebError::Unauthorized(
            "Invalid Authorization header".to_string(),
        ));
    }

    match token {
        Some(t) => Ok(Some(t.to_string())),
        None => Err(WebError::Unauthorized(
            "Missing authorization token".to_string(),
        )),
    }
}

async fn lookup_user(state: &ServerState, token: &str) -> WebResult<MUser> {
    let token_data = decode_jwt(state, token)?;

    // A well-formed token pointing at a missing row is distinct from a bad
    // token: the account was deleted after the token was issued.
    EUser::find_by_id(token_data.claims.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("User"))
}

pub fn encode_jwt(state: &ServerState, id: Uuid) -> WebResult<String> {
    let now = Utc::now();
    let expire: chrono::TimeDelta = Duration::hours(24);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;

    let claim = Claims { iat, exp, id };
    let secret = load_secret(&state.cli.jwt_secret_file);

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|_| WebError::failed_to_generate_token())
}

pub fn decode_jwt(state: &ServerState, jwt: &str) -> WebResult<TokenData<Claims>> {
    let secret = load_secret(&state.cli.jwt_secret_file);

    decode(
        jwt,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| WebError::Unauthorized("Unable to decode token".to_string()))
}

pub async fn update_last_login(state: &ServerState, user: MUser) -> Result<MUser> {
    let mut auser: AUser = user.into();

    auser.last_login_at = Set(Utc::now().naive_utc());
    auser
        .update(&state.db)
        .await
        .context("Failed to update user last login")
}
