/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub use sea_orm_migration::prelude::*;

mod m20250512_100000_create_table_user;
mod m20250512_100100_create_table_project;
mod m20250512_100200_create_table_commit;
mod m20250512_100300_create_table_comment;
mod m20250512_100400_create_table_project_user;
mod m20250512_100500_create_table_notification;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250512_100000_create_table_user::Migration),
            Box::new(m20250512_100100_create_table_project::Migration),
            Box::new(m20250512_100200_create_table_commit::Migration),
            Box::new(m20250512_100300_create_table_comment::Migration),
            Box::new(m20250512_100400_create_table_project_user::Migration),
            Box::new(m20250512_100500_create_table_notification::Migration),
        ]
    }
}
