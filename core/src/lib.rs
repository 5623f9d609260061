/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod consts;
pub mod database;
pub mod input;
pub mod types;

use clap::Parser;
use database::connect_db;
use std::sync::Arc;
use types::*;

pub async fn init_state() -> anyhow::Result<Arc<ServerState>> {
    let cli = Cli::parse();

    tracing::info!("Starting Atelier Server on {}:{}", cli.ip, cli.port);

    let db = connect_db(&cli).await?;

    Ok(Arc::new(ServerState { db, cli }))
}
