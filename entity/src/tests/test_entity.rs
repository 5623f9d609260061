/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::{project, project_user, user};
use chrono::DateTime;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::uuid;

fn null_time() -> chrono::NaiveDateTime {
    DateTime::from_timestamp(0, 0).unwrap().naive_utc()
}

#[tokio::test]
async fn test_find_user() -> Result<(), DbErr> {
    let alice = user::Model {
        id: uuid!("00000000-0000-0000-0000-00000000000a"),
        username: "alice".to_owned(),
        password: "argon2-hash".to_owned(),
        profile_image: None,
        last_login_at: null_time(),
        created_at: null_time(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![alice.clone()]])
        .into_connection();

    assert_eq!(user::Entity::find().one(&db).await?, Some(alice));

    Ok(())
}

#[tokio::test]
async fn test_find_projects() -> Result<(), DbErr> {
    let first = project::Model {
        id: uuid!("00000000-0000-0000-0000-000000000001"),
        name: "sketchbook".to_owned(),
        description: "daily warmups".to_owned(),
        visible: true,
        tags: vec!["ink".to_owned(), "daily".to_owned()],
        star_count: 3,
        created_by: uuid!("00000000-0000-0000-0000-00000000000a"),
        created_at: null_time(),
    };
    let second = project::Model {
        id: uuid!("00000000-0000-0000-0000-000000000002"),
        name: "pixel-garden".to_owned(),
        description: "tile studies".to_owned(),
        visible: false,
        tags: vec![],
        star_count: 0,
        created_by: uuid!("00000000-0000-0000-0000-00000000000a"),
        created_at: null_time(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![first.clone(), second.clone()]])
        .into_connection();

    assert_eq!(project::Entity::find().all(&db).await?, [first, second]);

    Ok(())
}

#[test]
fn test_project_user_kind_values() {
    // Wire values are part of the schema; renumbering would corrupt
    // existing rows.
    assert_eq!(project_user::ProjectUserKind::Member.to_value(), 0);
    assert_eq!(project_user::ProjectUserKind::Star.to_value(), 1);
}
