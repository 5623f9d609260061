/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::consts::GUEST_USERNAME;
use super::input::{greater_than_zero, port_in_range};
use clap::Parser;
use entity::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "Atelier", display_name = "Atelier", bin_name = "atelier-server", author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "ATELIER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "ATELIER_IP", default_value = "127.0.0.1")]
    pub ip: String,
    #[arg(long, env = "ATELIER_PORT", value_parser = port_in_range, default_value_t = 3000)]
    pub port: u16,
    #[arg(
        long,
        env = "ATELIER_SERVE_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    pub serve_url: String,
    #[arg(long, env = "ATELIER_DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "ATELIER_DATABASE_URL_FILE")]
    pub database_url_file: Option<String>,
    #[arg(long, env = "ATELIER_JWT_SECRET_FILE")]
    pub jwt_secret_file: String,
    #[arg(long, env = "ATELIER_DISABLE_REGISTRATION", default_value = "false")]
    pub disable_registration: bool,
    #[arg(long, env = "ATELIER_MAX_IMAGE_BYTES", value_parser = greater_than_zero::<usize>, default_value = "10485760")]
    pub max_image_bytes: usize,
}

#[derive(Debug)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub cli: Cli,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BaseResponse<T> {
    pub error: bool,
    pub message: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    pub id: Uuid,
    pub name: String,
}

pub type ListResponse = Vec<ListItem>;

/// The resolved caller of a request: a real user row or the anonymous
/// guest fallback (`id: None`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Option<Uuid>,
    pub username: String,
    pub profile_image: Option<String>,
}

impl Identity {
    pub fn guest() -> Self {
        Self {
            id: None,
            username: GUEST_USERNAME.to_string(),
            profile_image: None,
        }
    }

    pub fn is_guest(&self) -> bool {
        self.id.is_none()
    }
}

impl From<MUser> for Identity {
    fn from(user: MUser) -> Self {
        Self {
            id: Some(user.id),
            username: user.username,
            profile_image: user.profile_image,
        }
    }
}

pub type EComment = comment::Entity;
pub type ECommit = commit::Entity;
pub type ENotification = notification::Entity;
pub type EProject = project::Entity;
pub type EProjectUser = project_user::Entity;
pub type EUser = user::Entity;

pub type MComment = comment::Model;
pub type MCommit = commit::Model;
pub type MNotification = notification::Model;
pub type MProject = project::Model;
pub type MProjectUser = project_user::Model;
pub type MUser = user::Model;

pub type AComment = comment::ActiveModel;
pub type ACommit = commit::ActiveModel;
pub type ANotification = notification::ActiveModel;
pub type AProject = project::ActiveModel;
pub type AProjectUser = project_user::ActiveModel;
pub type AUser = user::ActiveModel;

pub type CComment = comment::Column;
pub type CCommit = commit::Column;
pub type CNotification = notification::Column;
pub type CProject = project::Column;
pub type CProjectUser = project_user::Column;
pub type CUser = user::Column;
