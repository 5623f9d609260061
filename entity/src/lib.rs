/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#[cfg(test)]
mod tests;

pub mod comment;
pub mod commit;
pub mod notification;
pub mod project;
pub mod project_user;
pub mod user;
