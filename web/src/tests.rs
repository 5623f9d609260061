/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::Utc;
use atelier_core::types::*;
use entity::notification::{NotificationKind, NotificationStatus};
use entity::project_user::ProjectUserKind;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::authorization::{decode_jwt, encode_jwt};
use crate::endpoints::auth::*;
use crate::endpoints::comments::MakeCommentRequest;
use crate::endpoints::commits::MakeCommitRequest;
use crate::endpoints::invites::MakeInviteRequest;
use crate::endpoints::projects::{MakeProjectRequest, PatchProjectRequest, ProjectAction};
use crate::error::WebError;

fn create_mock_cli() -> Cli {
    Cli {
        log_level: "debug".to_string(),
        ip: "127.0.0.1".to_string(),
        port: 3000,
        serve_url: "http://127.0.0.1:8000".to_string(),
        database_url: Some("mock://test".to_string()),
        database_url_file: None,
        jwt_secret_file: "test_jwt".to_string(),
        disable_registration: false,
        max_image_bytes: 1024,
    }
}

fn create_mock_state(db: MockDatabase) -> Arc<ServerState> {
    Arc::new(ServerState {
        db: db.into_connection(),
        cli: create_mock_cli(),
    })
}

fn create_mock_user() -> MUser {
    MUser {
        id: Uuid::new_v4(),
        username: "testuser".to_string(),
        password: "hash".to_string(),
        profile_image: None,
        last_login_at: Utc::now().naive_utc(),
        created_at: Utc::now().naive_utc(),
    }
}

fn create_mock_project(created_by: Uuid) -> MProject {
    MProject {
        id: Uuid::new_v4(),
        name: "sunset study".to_string(),
        description: "oil on canvas".to_string(),
        visible: true,
        tags: vec![],
        star_count: 0,
        created_by,
        created_at: Utc::now().naive_utc(),
    }
}

fn into_statement_log(state: Arc<ServerState>) -> String {
    let state = Arc::try_unwrap(state).expect("state still borrowed");
    format!("{:?}", state.db.into_transaction_log())
}

#[test]
fn test_server_state_configuration() {
    let state = create_mock_state(MockDatabase::new(DatabaseBackend::Postgres));

    assert!(!state.cli.disable_registration);
    assert_eq!(state.cli.ip, "127.0.0.1");
    assert_eq!(state.cli.port, 3000);
    assert_eq!(state.cli.serve_url, "http://127.0.0.1:8000");
}

#[test]
fn test_guest_identity() {
    let guest = Identity::guest();

    assert!(guest.is_guest());
    assert!(guest.id.is_none());
    assert_eq!(guest.username, "Guest");

    let identity = Identity::from(create_mock_user());
    assert!(!identity.is_guest());
}

#[tokio::test]
async fn test_register_password_mismatch() {
    // No query results appended: the mismatch must reject the request
    // before the store is ever consulted.
    let state = create_mock_state(MockDatabase::new(DatabaseBackend::Postgres));

    let body = MakeUserRequest {
        username: "testuser".to_string(),
        password: "password123".to_string(),
        password2: "password124".to_string(),
    };

    let result = post_register(State(state), Json(body)).await;

    assert!(matches!(result, Err(WebError::BadRequest(_))));
}

#[tokio::test]
async fn test_register_disabled() {
    let db = MockDatabase::new(DatabaseBackend::Postgres);
    let mut cli = create_mock_cli();
    cli.disable_registration = true;

    let state = Arc::new(ServerState {
        db: db.into_connection(),
        cli,
    });

    let body = MakeUserRequest {
        username: "testuser".to_string(),
        password: "password123".to_string(),
        password2: "password123".to_string(),
    };

    let result = post_register(State(state), Json(body)).await;

    assert!(matches!(result, Err(WebError::BadRequest(_))));
}

#[tokio::test]
async fn test_login_unknown_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<MUser>::new()]);
    let state = create_mock_state(db);

    let body = MakeLoginRequest {
        username: "nobody".to_string(),
        password: "password123".to_string(),
    };

    let result = post_login(State(state), Json(body)).await;

    assert!(matches!(result, Err(WebError::Unauthorized(_))));
}

#[tokio::test]
async fn test_commit_empty_message_rejected_before_query() {
    let state = create_mock_state(MockDatabase::new(DatabaseBackend::Postgres));

    let body = MakeCommitRequest {
        commit_message: "   ".to_string(),
        commit_image: "aGVsbG8=".to_string(),
    };

    let result = crate::endpoints::commits::post_commit(
        State(state),
        Extension(create_mock_user()),
        Path(Uuid::new_v4()),
        Json(body),
    )
    .await;

    assert!(matches!(result, Err(WebError::BadRequest(_))));
}

#[tokio::test]
async fn test_commit_invalid_image_rejected_before_query() {
    let state = create_mock_state(MockDatabase::new(DatabaseBackend::Postgres));

    let body = MakeCommitRequest {
        commit_message: "first draft".to_string(),
        commit_image: "not base64 !!".to_string(),
    };

    let result = crate::endpoints::commits::post_commit(
        State(state),
        Extension(create_mock_user()),
        Path(Uuid::new_v4()),
        Json(body),
    )
    .await;

    assert!(matches!(result, Err(WebError::BadRequest(_))));
}

#[tokio::test]
async fn test_comment_empty_content_rejected_before_query() {
    let state = create_mock_state(MockDatabase::new(DatabaseBackend::Postgres));

    let body = MakeCommentRequest {
        content: "  ".to_string(),
    };

    let result = crate::endpoints::comments::post_comment(
        State(state),
        Extension(create_mock_user()),
        Path((Uuid::new_v4(), Uuid::new_v4())),
        Json(body),
    )
    .await;

    assert!(matches!(result, Err(WebError::BadRequest(_))));
}

#[tokio::test]
async fn test_makeproject_missing_image_rejected_before_query() {
    let state = create_mock_state(MockDatabase::new(DatabaseBackend::Postgres));

    let body = MakeProjectRequest {
        project_name: "sunset study".to_string(),
        description: "oil on canvas".to_string(),
        tags: "oil, landscape".to_string(),
        commit_message: "first draft".to_string(),
        commit_image: String::new(),
    };

    let result = crate::endpoints::projects::post_makeproject(
        State(state),
        Extension(create_mock_user()),
        Json(body),
    )
    .await;

    assert!(matches!(result, Err(WebError::BadRequest(_))));
}

#[tokio::test]
async fn test_decline_invite_updates_status_only() {
    let user = create_mock_user();
    let project_id = Uuid::new_v4();

    let notification = MNotification {
        id: Uuid::new_v4(),
        recipient: user.id,
        actor: Uuid::new_v4(),
        kind: NotificationKind::Invite,
        status: NotificationStatus::Pending,
        project: project_id,
        commit: None,
        created_at: Utc::now().naive_utc(),
    };

    let declined = MNotification {
        status: NotificationStatus::Declined,
        ..notification.clone()
    };

    // Two statements only: the lookup and the status update. A membership
    // insert would fail the mock for lack of a prepared result.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![notification.clone()]])
        .append_query_results([vec![declined]]);
    let state = create_mock_state(db);

    let result = crate::endpoints::notifications::patch_respond(
        State(state),
        Extension(user),
        Path((notification.id, "decline".to_string())),
    )
    .await;

    let Json(response) = result.expect("decline should succeed");
    assert!(!response.error);
    assert_eq!(response.message, "Invitation declined");
}

#[tokio::test]
async fn test_respond_foreign_notification_forbidden() {
    let notification = MNotification {
        id: Uuid::new_v4(),
        recipient: Uuid::new_v4(),
        actor: Uuid::new_v4(),
        kind: NotificationKind::Invite,
        status: NotificationStatus::Pending,
        project: Uuid::new_v4(),
        commit: None,
        created_at: Utc::now().naive_utc(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![notification.clone()]]);
    let state = create_mock_state(db);

    let result = crate::endpoints::notifications::patch_respond(
        State(state),
        Extension(create_mock_user()),
        Path((notification.id, "accept".to_string())),
    )
    .await;

    assert!(matches!(result, Err(WebError::Forbidden(_))));
}

#[tokio::test]
async fn test_register_duplicate_username_conflict() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![create_mock_user()]]);
    let state = create_mock_state(db);

    let body = MakeUserRequest {
        username: "testuser".to_string(),
        password: "password123".to_string(),
        password2: "password123".to_string(),
    };

    let result = post_register(State(state), Json(body)).await;

    assert!(matches!(result, Err(WebError::Conflict(_))));
}

#[tokio::test]
async fn test_star_toggle_twice_restores_state() {
    let user = create_mock_user();
    let project = create_mock_project(Uuid::new_v4());

    let starred = MProject {
        star_count: 1,
        ..project.clone()
    };
    let star_row = MProjectUser {
        id: Uuid::new_v4(),
        project: project.id,
        user: user.id,
        kind: ProjectUserKind::Star,
    };

    // First toggle: project lookup, no star row, insert + counter bump.
    // Second toggle: project lookup, star row found, delete + counter drop.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![project.clone()]])
        .append_query_results([Vec::<MProjectUser>::new()])
        .append_query_results([vec![star_row.clone()]])
        .append_query_results([vec![starred]])
        .append_query_results([vec![star_row]])
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ]);
    let state = create_mock_state(db);

    let body = PatchProjectRequest {
        action: ProjectAction::ToggleStar,
    };
    let Json(first) = crate::endpoints::projects::patch_project(
        State(Arc::clone(&state)),
        Extension(user.clone()),
        Path(project.id),
        Json(body),
    )
    .await
    .expect("first toggle should succeed");
    assert_eq!(first.message, "Star added");

    let body = PatchProjectRequest {
        action: ProjectAction::ToggleStar,
    };
    let Json(second) = crate::endpoints::projects::patch_project(
        State(Arc::clone(&state)),
        Extension(user),
        Path(project.id),
        Json(body),
    )
    .await
    .expect("second toggle should succeed");
    assert_eq!(second.message, "Star removed");

    // Both toggles moved the counter in the database, and the second one
    // removed the relation row the first one inserted.
    let log = into_statement_log(state);
    assert_eq!(log.matches("UPDATE").count(), 2);
    assert_eq!(log.matches("DELETE").count(), 1);
}

#[tokio::test]
async fn test_accept_invite_adds_membership() {
    let user = create_mock_user();
    let project_id = Uuid::new_v4();

    let notification = MNotification {
        id: Uuid::new_v4(),
        recipient: user.id,
        actor: Uuid::new_v4(),
        kind: NotificationKind::Invite,
        status: NotificationStatus::Pending,
        project: project_id,
        commit: None,
        created_at: Utc::now().naive_utc(),
    };

    let accepted = MNotification {
        status: NotificationStatus::Accepted,
        ..notification.clone()
    };

    let membership = MProjectUser {
        id: Uuid::new_v4(),
        project: project_id,
        user: user.id,
        kind: ProjectUserKind::Member,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![notification.clone()]])
        .append_query_results([vec![accepted]])
        .append_query_results([Vec::<MProjectUser>::new()])
        .append_query_results([vec![membership]]);
    let state = create_mock_state(db);

    let result = crate::endpoints::notifications::patch_respond(
        State(Arc::clone(&state)),
        Extension(user),
        Path((notification.id, "accept".to_string())),
    )
    .await;

    let Json(response) = result.expect("accept should succeed");
    assert_eq!(response.message, "Invitation accepted");

    let log = into_statement_log(state);
    assert!(log.contains("INSERT"));
    assert!(log.contains("project_user"));
}

#[tokio::test]
async fn test_invite_search_requires_term() {
    let user = create_mock_user();
    let project = create_mock_project(user.id);

    // Project lookup and member list only; an unqualified request must not
    // query the user table.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![project.clone()]])
        .append_query_results([Vec::<MProjectUser>::new()]);
    let state = create_mock_state(db);

    let result = crate::endpoints::invites::get_invite(
        State(state),
        Extension(user),
        Path(project.id),
        Query(HashMap::new()),
    )
    .await;

    let Json(response) = result.expect("invite page should load");
    assert!(response.users.is_empty());
    assert!(response.members.is_empty());
}

#[tokio::test]
async fn test_reinvite_pending_is_noop() {
    let user = create_mock_user();
    let target = create_mock_user();
    let project = create_mock_project(user.id);

    let pending = MNotification {
        id: Uuid::new_v4(),
        recipient: target.id,
        actor: user.id,
        kind: NotificationKind::Invite,
        status: NotificationStatus::Pending,
        project: project.id,
        commit: None,
        created_at: Utc::now().naive_utc(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![project.clone()]])
        .append_query_results([vec![target.clone()]])
        .append_query_results([Vec::<MProjectUser>::new()])
        .append_query_results([vec![pending]]);
    let state = create_mock_state(db);

    let body = MakeInviteRequest { user_id: target.id };

    let result = crate::endpoints::invites::post_invite(
        State(Arc::clone(&state)),
        Extension(user),
        Path(project.id),
        Json(body),
    )
    .await;

    let Json(response) = result.expect("reinvite should be a no-op");
    assert!(!response.error);
    assert_eq!(response.message, "Invitation already pending");

    let log = into_statement_log(state);
    assert!(!log.contains("INSERT"));
}

#[test]
fn test_jwt_round_trip() {
    let secret_path = std::env::temp_dir().join(format!("atelier-jwt-{}", Uuid::new_v4()));
    std::fs::write(&secret_path, "round-trip-secret\n").unwrap();

    let mut cli = create_mock_cli();
    cli.jwt_secret_file = secret_path.to_string_lossy().to_string();

    let state = ServerState {
        db: MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        cli,
    };

    let user_id = Uuid::new_v4();
    let token = encode_jwt(&state, user_id).unwrap();
    let decoded = decode_jwt(&state, &token).unwrap();

    assert_eq!(decoded.claims.id, user_id);
    assert!(decoded.claims.exp > decoded.claims.iat);

    std::fs::remove_file(&secret_path).ok();
}

#[test]
fn test_jwt_rejects_foreign_secret() {
    let secret_a = std::env::temp_dir().join(format!("atelier-jwt-{}", Uuid::new_v4()));
    let secret_b = std::env::temp_dir().join(format!("atelier-jwt-{}", Uuid::new_v4()));
    std::fs::write(&secret_a, "secret-a").unwrap();
    std::fs::write(&secret_b, "secret-b").unwrap();

    let mut cli = create_mock_cli();
    cli.jwt_secret_file = secret_a.to_string_lossy().to_string();

    let state_a = ServerState {
        db: MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        cli,
    };

    let mut cli = create_mock_cli();
    cli.jwt_secret_file = secret_b.to_string_lossy().to_string();

    let state_b = ServerState {
        db: MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        cli,
    };

    let token = encode_jwt(&state_a, Uuid::new_v4()).unwrap();
    let result = decode_jwt(&state_b, &token);

    assert!(matches!(result, Err(WebError::Unauthorized(_))));

    std::fs::remove_file(&secret_a).ok();
    std::fs::remove_file(&secret_b).ok();
}

mod serde_tests {
    use super::*;

    #[test]
    fn test_make_login_request_serialization() {
        let request = MakeLoginRequest {
            username: "testuser".to_string(),
            password: "password123".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("testuser"));
        assert!(json.contains("password123"));
    }

    #[test]
    fn test_make_user_request_serialization() {
        let request = MakeUserRequest {
            username: "testuser".to_string(),
            password: "password123".to_string(),
            password2: "password123".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("username"));
        assert!(json.contains("password2"));
    }

    #[test]
    fn test_make_project_request_deserialization() {
        let json = r#"{
            "project_name": "sunset study",
            "description": "oil on canvas",
            "tags": "oil, landscape",
            "commit_message": "first draft",
            "commit_image": "aGVsbG8="
        }"#;

        let request: MakeProjectRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.project_name, "sunset study");
        assert_eq!(request.tags, "oil, landscape");
    }

    #[test]
    fn test_project_action_wire_names() {
        let toggle_star: ProjectAction = serde_json::from_str(r#""toggle_star""#).unwrap();
        assert_eq!(toggle_star, ProjectAction::ToggleStar);

        let toggle_visibility: ProjectAction =
            serde_json::from_str(r#""toggle_visibility""#).unwrap();
        assert_eq!(toggle_visibility, ProjectAction::ToggleVisibility);

        let request: PatchProjectRequest =
            serde_json::from_str(r#"{"action": "toggle_star"}"#).unwrap();
        assert_eq!(request.action, ProjectAction::ToggleStar);

        assert!(serde_json::from_str::<ProjectAction>(r#""toggleStar""#).is_err());
    }

    #[test]
    fn test_base_response_serialization() {
        let response = BaseResponse {
            error: true,
            message: "Project not found".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error\":true"));
        assert!(json.contains("Project not found"));
    }
}
