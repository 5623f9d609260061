/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::extract::{Query, State};
use axum::{Extension, Json};
use atelier_core::types::*;
use entity::notification::NotificationKind;
use entity::notification::NotificationStatus;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::WebResult;

#[derive(Serialize, Deserialize, Debug)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub star_count: i32,
    pub created_by: Uuid,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NotificationSummary {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub actor: Uuid,
    pub project: Uuid,
    pub commit: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HomeResponse {
    pub projects: Vec<ProjectSummary>,
    pub notifications: Vec<NotificationSummary>,
    pub user_id: Option<Uuid>,
}

pub async fn get_home(
    state: State<Arc<ServerState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<HashMap<String, String>>,
) -> WebResult<Json<HomeResponse>> {
    let mut project_query = EProject::find().filter(CProject::Visible.eq(true));

    if let Some(search) = query.get("search").filter(|s| !s.is_empty()) {
        project_query = project_query.filter(
            Condition::any()
                .add(CProject::Name.contains(search))
                .add(CProject::Description.contains(search)),
        );
    }

    // Star ordering reads the denormalized counter; it is kept in sync
    // with the star relation transactionally.
    let project_query = match query.get("sort").map(String::as_str) {
        Some("stars") | None => project_query.order_by_desc(CProject::StarCount),
        Some(_) => project_query.order_by_desc(CProject::CreatedAt),
    };

    let projects = project_query
        .all(&state.db)
        .await?
        .into_iter()
        .map(|p| ProjectSummary {
            id: p.id,
            name: p.name,
            description: p.description,
            tags: p.tags,
            star_count: p.star_count,
            created_by: p.created_by,
            created_at: p.created_at,
        })
        .collect();

    let notifications = match identity.id {
        Some(user_id) => ENotification::find()
            .filter(
                Condition::all()
                    .add(CNotification::Recipient.eq(user_id))
                    .add(CNotification::Status.eq(NotificationStatus::Pending)),
            )
            .order_by_desc(CNotification::CreatedAt)
            .all(&state.db)
            .await?
            .into_iter()
            .map(|n| NotificationSummary {
                id: n.id,
                kind: n.kind,
                actor: n.actor,
                project: n.project,
                commit: n.commit,
                created_at: n.created_at,
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(Json(HomeResponse {
        projects,
        notifications,
        user_id: identity.id,
    }))
}
