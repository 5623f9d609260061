/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::{DateTime, NaiveDateTime};
use std::ops::RangeInclusive;
use std::sync::LazyLock;

pub const PORT_RANGE: RangeInclusive<usize> = 1..=65535;

pub static NULL_TIME: LazyLock<NaiveDateTime> =
    LazyLock::new(|| DateTime::from_timestamp(0, 0).unwrap().naive_utc());

pub const MAX_USERNAME_LEN: usize = 20;
pub const MAX_PROJECT_NAME_LEN: usize = 128;
pub const MAX_COMMIT_MESSAGE_LEN: usize = 256;

pub const GUEST_USERNAME: &str = "Guest";
