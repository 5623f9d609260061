/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod authorization;
pub mod endpoints;
pub mod error;

#[cfg(test)]
mod tests;

use axum::routing::{get, patch, post};
use axum::{Router, middleware};
use atelier_core::types::ServerState;
use http::HeaderValue;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub async fn serve_web(state: Arc<ServerState>) -> std::io::Result<()> {
    let server_url = format!("{}:{}", state.cli.ip, state.cli.port);

    let cors_origin = state
        .cli
        .serve_url
        .parse::<HeaderValue>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(cors_origin))
        .allow_headers(vec![AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true);

    let protected = Router::new()
        .route(
            "/profile/{user_id}",
            get(endpoints::profile::get_profile).post(endpoints::profile::post_profile),
        )
        .route("/makeproject", post(endpoints::projects::post_makeproject))
        .route(
            "/project/{project}",
            get(endpoints::projects::get_project)
                .patch(endpoints::projects::patch_project)
                .delete(endpoints::projects::delete_project),
        )
        .route(
            "/project/{project}/invite",
            get(endpoints::invites::get_invite).post(endpoints::invites::post_invite),
        )
        .route(
            "/project/{project}/commit",
            post(endpoints::commits::post_commit),
        )
        .route(
            "/project/{project}/commits",
            get(endpoints::commits::get_commits),
        )
        .route(
            "/project/{project}/commit/{commit}",
            get(endpoints::commits::get_commit).post(endpoints::comments::post_comment),
        )
        .route(
            "/notification/{notification}/respond/{response}",
            patch(endpoints::notifications::patch_respond),
        )
        .route("/logout", post(endpoints::auth::post_logout))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            authorization::authorize,
        ));

    // The feed is readable without credentials; a presented token is still
    // validated so a logged-in caller sees their notifications.
    let guest = Router::new()
        .route("/", get(endpoints::home::get_home))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            authorization::identify,
        ));

    let app = Router::new()
        .merge(protected)
        .merge(guest)
        .route("/login", post(endpoints::auth::post_login))
        .route("/register", post(endpoints::auth::post_register))
        .route("/health", get(endpoints::get_health))
        .fallback(endpoints::handle_404)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    axum::serve(listener, app).await
}
